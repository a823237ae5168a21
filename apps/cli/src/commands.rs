//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use pagecraft_core::{
    EventSink, Orchestrator, PipelineEvent, PipelineOptions, PipelineState, PipelineStatus,
    TracingSink,
};
use pagecraft_shared::{AppConfig, GeneratedPages, RawProduct, init_config, load_config};
use tracing::info;

/// Built-in sample record used when no input file is given.
const SAMPLE_RECORD: &str = include_str!("../../../fixtures/json/glowboost.fixture.json");

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pagecraft: generate product content pages from a single record.
#[derive(Parser)]
#[command(
    name = "pagecraft",
    version,
    about = "Generate FAQ, product, and comparison pages from a product record.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline and write the three pages.
    Generate {
        /// Raw product record (JSON object). Defaults to the built-in sample.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (overrides `[output] dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Run question synthesis and comparison concurrently.
        #[arg(long)]
        concurrent: bool,

        /// Skip writing manifest.json.
        #[arg(long)]
        no_manifest: bool,

        /// Print the pages as JSON to stdout instead of writing files.
        #[arg(long)]
        stdout: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagecraft=info,pagecraft_core=info,pagecraft_artifacts=info",
        1 => "pagecraft=debug,pagecraft_core=debug,pagecraft_artifacts=debug",
        _ => "pagecraft=trace,pagecraft_core=trace,pagecraft_artifacts=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            input,
            out,
            concurrent,
            no_manifest,
            stdout,
        } => {
            let mut config = load_config()?;
            if concurrent {
                config.pipeline.concurrent_stages = true;
            }
            if no_manifest {
                config.output.write_manifest = false;
            }
            if let Some(out) = out {
                config.output.dir = out.to_string_lossy().into_owned();
            }
            cmd_generate(input.as_deref(), &config, stdout)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(input: Option<&Path>, config: &AppConfig, stdout: bool) -> Result<()> {
    let raw = read_record(input)?;
    let options = PipelineOptions::from(&config.pipeline);

    info!(
        input = %input.map_or_else(|| "<sample>".to_string(), |p| p.display().to_string()),
        concurrent = options.concurrent_stages,
        "generating pages"
    );

    let mut orchestrator = Orchestrator::with_options(Arc::new(CliProgress::new(!stdout)), options);
    let outcome = orchestrator.execute(&raw);
    let status = orchestrator.status();

    let pages = match outcome {
        Ok(pages) => pages,
        Err(err) => {
            print_status(&status);
            return Err(err).wrap_err("content generation failed");
        }
    };

    if stdout {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    let dir = PathBuf::from(&config.output.dir);
    let written = pagecraft_artifacts::write_pages(
        &dir,
        &pages,
        &config.output,
        env!("CARGO_PKG_VERSION"),
    )?;

    print_summary(&pages, &status);
    for meta in &written.artifacts {
        println!("  Wrote:  {}", written.dir.join(&meta.filename).display());
    }
    if let Some(manifest) = &written.manifest {
        println!("  Run ID: {}", manifest.run_id);
    }
    println!();

    Ok(())
}

/// Parse the input file, or the built-in sample when none is given.
fn read_record(input: Option<&Path>) -> Result<RawProduct> {
    let (source, content) = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("cannot read input file '{}'", path.display()))?;
            (path.display().to_string(), content)
        }
        None => ("<sample>".to_string(), SAMPLE_RECORD.to_string()),
    };

    serde_json::from_str(&content)
        .map_err(|e| eyre!("input {source} is not a JSON object of product fields: {e}"))
}

fn print_summary(pages: &GeneratedPages, status: &PipelineStatus) {
    println!();
    println!("  Pages generated successfully!");
    println!("  Product:    {}", pages.faq.product_name);
    println!("  FAQ:        {} questions", pages.faq.total_questions);
    println!(
        "  Comparison: {} rows vs {}",
        pages.comparison.comparison_table.len(),
        pages.comparison.product_b.name
    );
    println!("  State:      {}", status.current_state);
}

fn print_status(status: &PipelineStatus) {
    let flag = |b: bool| if b { "yes" } else { "no" };
    eprintln!();
    eprintln!("  State:                {}", status.current_state);
    eprintln!("  Product parsed:       {}", flag(status.product_parsed));
    eprintln!("  Questions generated:  {}", flag(status.questions_generated));
    eprintln!("  Comparison generated: {}", flag(status.comparison_generated));
    eprintln!(
        "  Outputs ready:        faq={} product_page={} comparison={}",
        flag(status.outputs_ready.faq),
        flag(status.outputs_ready.product_page),
        flag(status.outputs_ready.comparison)
    );
    eprintln!();
}

// ---------------------------------------------------------------------------
// CLI progress sink
// ---------------------------------------------------------------------------

/// Event sink that drives an indicatif spinner and forwards to tracing.
struct CliProgress {
    spinner: Option<ProgressBar>,
    tracing: TracingSink,
}

impl CliProgress {
    fn new(show_spinner: bool) -> Self {
        let spinner = show_spinner.then(|| {
            let spinner = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
            spinner.set_style(style);
            spinner.enable_steady_tick(std::time::Duration::from_millis(80));
            spinner
        });
        Self {
            spinner,
            tracing: TracingSink,
        }
    }
}

impl EventSink for CliProgress {
    fn emit(&self, event: &PipelineEvent) {
        self.tracing.emit(event);

        let Some(spinner) = &self.spinner else {
            return;
        };
        match event {
            PipelineEvent::StageStarted { stage } => {
                spinner.set_message(format!("Running {stage}"));
            }
            PipelineEvent::StageCompleted { detail, .. } => {
                spinner.set_message(detail.clone());
            }
            PipelineEvent::Transition {
                to: PipelineState::Completed,
                ..
            } => spinner.finish_and_clear(),
            PipelineEvent::Transition { .. } => {}
            PipelineEvent::Failed { state, .. } => {
                spinner.abandon_with_message(format!("Failed during {state}"));
            }
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
