//! Application configuration for Pagecraft.
//!
//! User config lives at `~/.pagecraft/pagecraft.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagecraftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagecraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagecraft";

// ---------------------------------------------------------------------------
// Config structs (matching pagecraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how generated pages are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Pipeline execution settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the page files are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File name for the FAQ page.
    #[serde(default = "default_faq_file")]
    pub faq_file: String,

    /// File name for the product description page.
    #[serde(default = "default_product_page_file")]
    pub product_page_file: String,

    /// File name for the comparison page.
    #[serde(default = "default_comparison_file")]
    pub comparison_file: String,

    /// Whether to write `manifest.json` next to the pages.
    #[serde(default = "default_true")]
    pub write_manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            faq_file: default_faq_file(),
            product_page_file: default_product_page_file(),
            comparison_file: default_comparison_file(),
            write_manifest: true,
        }
    }
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_faq_file() -> String {
    "faq.json".into()
}
fn default_product_page_file() -> String {
    "product_page.json".into()
}
fn default_comparison_file() -> String {
    "comparison_page.json".into()
}
fn default_true() -> bool {
    true
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run question synthesis and comparison on the rayon pool.
    #[serde(default)]
    pub concurrent_stages: bool,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagecraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagecraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagecraft/pagecraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagecraftError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PagecraftError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PagecraftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PagecraftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagecraftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
