//! End-to-end generation pipeline: raw record → product → questions +
//! comparison → FAQ, product, and comparison pages.
//!
//! The [`Orchestrator`] is a one-shot state machine. It owns the run context
//! exclusively, threads it through each stage, and records every state
//! transition. A failed stage moves it to [`PipelineState::Failed`] and the
//! error is returned unchanged; nothing is retried or rolled back.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use pagecraft_shared::{
    ComparisonPage, FaqPage, GeneratedPages, PagecraftError, PipelineConfig, Product,
    ProductPage, Question, RawProduct, Result,
};

use crate::assembler::{ComparisonPageAssembler, FaqAssembler, ProductPageAssembler};
use crate::comparator::{Comparator, Comparison};
use crate::events::{PipelineEvent, SharedSink};
use crate::normalizer::Normalizer;
use crate::questions::QuestionSynthesizer;
use crate::stage::Stage;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Pipeline states, in the order a successful run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineState {
    Initialized,
    Parsed,
    QuestionsGenerated,
    ComparisonGenerated,
    FaqAssembled,
    ProductPageAssembled,
    ComparisonPageAssembled,
    Completed,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "Initialized",
            Self::Parsed => "Parsed",
            Self::QuestionsGenerated => "QuestionsGenerated",
            Self::ComparisonGenerated => "ComparisonGenerated",
            Self::FaqAssembled => "FaqAssembled",
            Self::ProductPageAssembled => "ProductPageAssembled",
            Self::ComparisonPageAssembled => "ComparisonPageAssembled",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: PipelineState,
    pub to: PipelineState,
}

// ---------------------------------------------------------------------------
// Run context
// ---------------------------------------------------------------------------

/// Everything a run has produced so far.
///
/// Stages read it by reference; the orchestrator replaces it with a new
/// value after each stage rather than editing it in place.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    product: Option<Product>,
    questions: Option<Vec<Question>>,
    comparison: Option<Comparison>,
    faq: Option<FaqPage>,
    product_page: Option<ProductPage>,
    comparison_page: Option<ComparisonPage>,
}

impl RunContext {
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn questions(&self) -> Option<&[Question]> {
        self.questions.as_deref()
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn faq_page(&self) -> Option<&FaqPage> {
        self.faq.as_ref()
    }

    pub fn product_page(&self) -> Option<&ProductPage> {
        self.product_page.as_ref()
    }

    pub fn comparison_page(&self) -> Option<&ComparisonPage> {
        self.comparison_page.as_ref()
    }

    pub fn with_product(self, product: Product) -> Self {
        Self {
            product: Some(product),
            ..self
        }
    }

    pub fn with_questions(self, questions: Vec<Question>) -> Self {
        Self {
            questions: Some(questions),
            ..self
        }
    }

    pub fn with_comparison(self, comparison: Comparison) -> Self {
        Self {
            comparison: Some(comparison),
            ..self
        }
    }

    pub fn with_faq_page(self, page: FaqPage) -> Self {
        Self {
            faq: Some(page),
            ..self
        }
    }

    pub fn with_product_page(self, page: ProductPage) -> Self {
        Self {
            product_page: Some(page),
            ..self
        }
    }

    pub fn with_comparison_page(self, page: ComparisonPage) -> Self {
        Self {
            comparison_page: Some(page),
            ..self
        }
    }

    /// The three pages, once all of them exist.
    pub fn pages(&self) -> Option<GeneratedPages> {
        Some(GeneratedPages {
            faq: self.faq.clone()?,
            product_page: self.product_page.clone()?,
            comparison: self.comparison_page.clone()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Snapshot returned by [`Orchestrator::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStatus {
    pub current_state: PipelineState,
    pub product_parsed: bool,
    pub questions_generated: bool,
    pub comparison_generated: bool,
    pub outputs_ready: OutputsReady,
}

/// Per-page readiness flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputsReady {
    pub faq: bool,
    pub product_page: bool,
    pub comparison: bool,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Execution options for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Run question synthesis and comparison concurrently via `rayon::join`.
    pub concurrent_stages: bool,
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            concurrent_stages: config.concurrent_stages,
        }
    }
}

/// One-shot pipeline driver. Create a fresh instance per run.
pub struct Orchestrator {
    state: PipelineState,
    history: Vec<StateTransition>,
    context: RunContext,
    options: PipelineOptions,
    sink: SharedSink,
    normalizer: Normalizer,
    questions: QuestionSynthesizer,
    comparator: Comparator,
    faq: FaqAssembler,
    product_page: ProductPageAssembler,
    comparison_page: ComparisonPageAssembler,
}

impl Orchestrator {
    /// Build an orchestrator with sequential stages.
    pub fn new(sink: SharedSink) -> Self {
        Self::with_options(sink, PipelineOptions::default())
    }

    /// Build an orchestrator; every stage shares the given sink.
    pub fn with_options(sink: SharedSink, options: PipelineOptions) -> Self {
        Self {
            state: PipelineState::Initialized,
            history: Vec::new(),
            context: RunContext::default(),
            options,
            normalizer: Normalizer::new(sink.clone()),
            questions: QuestionSynthesizer::new(sink.clone()),
            comparator: Comparator::new(sink.clone()),
            faq: FaqAssembler::new(sink.clone()),
            product_page: ProductPageAssembler::new(sink.clone()),
            comparison_page: ComparisonPageAssembler::new(sink.clone()),
            sink,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Transitions recorded so far, oldest first.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// The state a failed run was in when its stage errored.
    pub fn failed_at(&self) -> Option<PipelineState> {
        self.history
            .iter()
            .find(|t| t.to == PipelineState::Failed)
            .map(|t| t.from)
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Current state plus what the run has produced so far.
    pub fn status(&self) -> PipelineStatus {
        let ctx = &self.context;
        PipelineStatus {
            current_state: self.state,
            product_parsed: ctx.product.is_some(),
            questions_generated: ctx.questions.is_some(),
            comparison_generated: ctx.comparison.is_some(),
            outputs_ready: OutputsReady {
                faq: ctx.faq.is_some(),
                product_page: ctx.product_page.is_some(),
                comparison: ctx.comparison_page.is_some(),
            },
        }
    }

    /// Run every stage over `raw`.
    ///
    /// Only valid on a freshly built orchestrator; a second call fails with
    /// [`PagecraftError::Reuse`] and leaves the state untouched.
    #[instrument(skip_all, fields(concurrent = self.options.concurrent_stages))]
    pub fn execute(&mut self, raw: &RawProduct) -> Result<GeneratedPages> {
        if self.state != PipelineState::Initialized {
            return Err(PagecraftError::Reuse {
                state: self.state.to_string(),
            });
        }

        let start = Instant::now();
        info!("starting content generation pipeline");

        match self.run_stages(raw) {
            Ok(pages) => {
                info!(
                    faq_questions = pages.faq.total_questions,
                    comparison_rows = pages.comparison.comparison_table.len(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "pipeline complete"
                );
                Ok(pages)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn run_stages(&mut self, raw: &RawProduct) -> Result<GeneratedPages> {
        let product = self.normalizer.run(raw)?;
        self.advance(|ctx| ctx.with_product(product), PipelineState::Parsed);

        // Both stages read only the product, so they may run side by side.
        let (questions, pending_comparison) = {
            let product = self.require_product()?;
            if self.options.concurrent_stages {
                let (questions, comparison) = rayon::join(
                    || self.questions.run(product),
                    || self.comparator.run(product),
                );
                (questions, Some(comparison))
            } else {
                (self.questions.run(product), None)
            }
        };

        let questions = questions?;
        self.advance(
            |ctx| ctx.with_questions(questions),
            PipelineState::QuestionsGenerated,
        );

        let comparison = match pending_comparison {
            Some(comparison) => comparison?,
            None => self.comparator.run(self.require_product()?)?,
        };
        self.advance(
            |ctx| ctx.with_comparison(comparison),
            PipelineState::ComparisonGenerated,
        );

        let faq = self.faq.run(&self.context)?;
        self.advance(|ctx| ctx.with_faq_page(faq), PipelineState::FaqAssembled);

        let product_page = self.product_page.run(&self.context)?;
        self.advance(
            |ctx| ctx.with_product_page(product_page),
            PipelineState::ProductPageAssembled,
        );

        let comparison_page = self.comparison_page.run(&self.context)?;
        self.advance(
            |ctx| ctx.with_comparison_page(comparison_page),
            PipelineState::ComparisonPageAssembled,
        );

        let pages = self
            .context
            .pages()
            .ok_or_else(|| PagecraftError::precondition("pages missing after assembly"))?;
        self.transition(PipelineState::Completed);

        Ok(pages)
    }

    fn require_product(&self) -> Result<&Product> {
        self.context
            .product()
            .ok_or_else(|| PagecraftError::precondition("product not parsed"))
    }

    /// Replace the context with the stage's contribution, then move on.
    fn advance(&mut self, update: impl FnOnce(RunContext) -> RunContext, to: PipelineState) {
        let ctx = std::mem::take(&mut self.context);
        self.context = update(ctx);
        self.transition(to);
    }

    fn transition(&mut self, to: PipelineState) {
        let from = self.state;
        debug_assert!(!from.is_terminal(), "transition out of terminal state {from}");

        info!(from = %from, to = %to, "state transition");
        self.state = to;
        self.history.push(StateTransition { from, to });
        self.sink.emit(&PipelineEvent::Transition { from, to });
    }

    fn fail(&mut self, err: PagecraftError) -> PagecraftError {
        let state = self.state;
        self.transition(PipelineState::Failed);
        self.sink.emit(&PipelineEvent::Failed {
            state,
            error: err.to_string(),
        });
        err
    }
}
