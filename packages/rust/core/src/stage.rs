//! The capability every pipeline step implements.

use pagecraft_shared::Result;

/// A pure transformation step with a defined input/output contract.
///
/// Stages hold no run state; the orchestrator owns everything a run
/// accumulates and hands each stage a borrowed view of what it needs.
pub trait Stage<In: ?Sized, Out>: Send + Sync {
    /// Stable name used in logs and events.
    fn name(&self) -> &'static str;

    /// Run the stage over its input.
    fn run(&self, input: &In) -> Result<Out>;
}
