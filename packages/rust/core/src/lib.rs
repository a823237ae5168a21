//! Core content-generation pipeline for Pagecraft.
//!
//! A raw product record flows through normalization, question synthesis,
//! comparison against a fixed counterpart, and page assembly. The
//! [`Orchestrator`] drives the stages as a one-shot state machine; [`generate`]
//! and [`handle_generate`] are the entry points most callers want.

pub mod api;
pub mod assembler;
pub mod blocks;
pub mod comparator;
pub mod events;
pub mod normalizer;
pub mod pipeline;
pub mod questions;
pub mod stage;
pub mod template;

pub use api::{ErrorResponse, GenerateResponse, generate, generate_with, handle_generate};
pub use events::{EventSink, PipelineEvent, SharedSink, SilentSink, TracingSink, silent};
pub use pipeline::{
    Orchestrator, OutputsReady, PipelineOptions, PipelineState, PipelineStatus, RunContext,
    StateTransition,
};
pub use stage::Stage;
