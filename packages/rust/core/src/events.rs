//! Structured pipeline events and the sinks that receive them.

use std::sync::Arc;

use tracing::{error, info};

use crate::pipeline::PipelineState;

/// A structured event emitted by stages and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A stage is about to run.
    StageStarted { stage: &'static str },
    /// A stage finished; `detail` is a short human summary.
    StageCompleted { stage: &'static str, detail: String },
    /// The orchestrator moved between states.
    Transition {
        from: PipelineState,
        to: PipelineState,
    },
    /// A stage error halted the run in `state`.
    Failed { state: PipelineState, error: String },
}

/// Receiver for pipeline events, injected into each component at construction.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PipelineEvent);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn EventSink>;

/// No-op sink for headless/test usage.
pub struct SilentSink;

impl EventSink for SilentSink {
    fn emit(&self, _event: &PipelineEvent) {}
}

/// Sink that re-emits every event through `tracing`.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage } => info!(stage, "stage started"),
            PipelineEvent::StageCompleted { stage, detail } => {
                info!(stage, detail = %detail, "stage completed");
            }
            PipelineEvent::Transition { from, to } => {
                info!(from = %from, to = %to, "state transition");
            }
            PipelineEvent::Failed { state, error } => {
                error!(state = %state, error = %error, "pipeline failed");
            }
        }
    }
}

/// Convenience constructor for the silent sink.
pub fn silent() -> SharedSink {
    Arc::new(SilentSink)
}
