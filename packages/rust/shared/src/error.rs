//! Error types for Pagecraft.
//!
//! Library crates use [`PagecraftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pagecraft operations.
#[derive(Debug, thiserror::Error)]
pub enum PagecraftError {
    /// A required key was absent from the raw input record.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A price string contained no digits to parse.
    #[error("cannot parse price {price:?}: no digits found")]
    PriceParse { price: String },

    /// An upstream stage did not provide what a page needs. Unreachable when
    /// the orchestrator wires the stages correctly.
    #[error("assembly precondition violated: {message}")]
    AssemblyPrecondition { message: String },

    /// `execute` was called on an orchestrator that already ran.
    #[error("pipeline instance already used (state: {state}); create a fresh orchestrator per run")]
    Reuse { state: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagecraftError>;

impl PagecraftError {
    /// Create a missing-field error for the given raw key.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a price-parse error for the offending price string.
    pub fn price_parse(price: impl Into<String>) -> Self {
        Self::PriceParse {
            price: price.into(),
        }
    }

    /// Create an assembly precondition error from any displayable message.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::AssemblyPrecondition {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for boundary responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::PriceParse { .. } => "price_parse",
            Self::AssemblyPrecondition { .. } => "assembly_precondition",
            Self::Reuse { .. } => "reuse",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    /// HTTP-style status for boundary responses.
    ///
    /// Input-caused failures map to 422, misuse of a consumed pipeline to 409,
    /// everything else to 500.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingField { .. } | Self::PriceParse { .. } => 422,
            Self::Reuse { .. } => 409,
            Self::AssemblyPrecondition { .. }
            | Self::Config { .. }
            | Self::Io { .. }
            | Self::Serialization(_) => 500,
        }
    }
}

impl From<serde_json::Error> for PagecraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
