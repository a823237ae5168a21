//! Request/response entry points.
//!
//! Each call builds a fresh [`Orchestrator`], so a caller never sees a
//! reuse error here. Failures come back as an [`ErrorResponse`] carrying a
//! status and a machine code instead of a partial payload.

use serde::Serialize;
use tracing::warn;

use pagecraft_shared::{GeneratedPages, PagecraftError, RawProduct, Result};

use crate::events::SharedSink;
use crate::pipeline::{Orchestrator, PipelineOptions, PipelineState};

/// Run the whole pipeline once over `raw`.
pub fn generate(raw: &RawProduct, sink: SharedSink) -> Result<GeneratedPages> {
    generate_with(raw, sink, PipelineOptions::default())
}

/// Same as [`generate`], with explicit execution options.
pub fn generate_with(
    raw: &RawProduct,
    sink: SharedSink,
    options: PipelineOptions,
) -> Result<GeneratedPages> {
    Orchestrator::with_options(sink, options).execute(raw)
}

/// Error body returned at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
    /// Pipeline state the run was in when it failed.
    pub state: PipelineState,
}

impl ErrorResponse {
    pub fn from_error(err: &PagecraftError, state: PipelineState) -> Self {
        Self {
            status: err.status(),
            code: err.code(),
            message: err.to_string(),
            state,
        }
    }
}

/// Either the three pages or an error body, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Success(GeneratedPages),
    Failure(ErrorResponse),
}

impl GenerateResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(err) => err.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Handle one generate request.
pub fn handle_generate(
    raw: &RawProduct,
    sink: SharedSink,
    options: PipelineOptions,
) -> GenerateResponse {
    let mut orchestrator = Orchestrator::with_options(sink, options);
    match orchestrator.execute(raw) {
        Ok(pages) => GenerateResponse::Success(pages),
        Err(err) => {
            let state = orchestrator.failed_at().unwrap_or(orchestrator.state());
            warn!(code = err.code(), state = %state, "generate request failed");
            GenerateResponse::Failure(ErrorResponse::from_error(&err, state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::silent;

    fn make_raw() -> RawProduct {
        let json = std::fs::read_to_string("../../../fixtures/json/glowboost.fixture.json")
            .expect("fixture");
        serde_json::from_str(&json).expect("fixture json")
    }

    #[test]
    fn generate_returns_all_pages() {
        let pages = generate(&make_raw(), silent()).unwrap();
        assert_eq!(pages.faq.product_name, "GlowBoost Vitamin C Serum");
        assert_eq!(pages.comparison.product_b.name, "RadiantGlow Niacinamide Serum");
    }

    #[test]
    fn generate_can_be_called_repeatedly() {
        let raw = make_raw();
        let first = generate(&raw, silent()).unwrap();
        let second = generate(&raw, silent()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn success_response_serializes_to_pages() {
        let response = handle_generate(&make_raw(), silent(), PipelineOptions::default());
        assert!(response.is_success());
        assert_eq!(response.status(), 200);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["faq"]["total_questions"], 5);
        assert!(json.get("code").is_none());
    }

    #[test]
    fn missing_field_response() {
        let raw = make_raw().without("name");
        let response = handle_generate(&raw, silent(), PipelineOptions::default());
        assert_eq!(response.status(), 422);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "missing_field");
        assert_eq!(json["state"], "Initialized");
        assert!(json.get("faq").is_none());
    }

    #[test]
    fn price_parse_response_names_failing_state() {
        let raw = make_raw().with("price", "contact us");
        let response = handle_generate(&raw, silent(), PipelineOptions::default());
        match response {
            GenerateResponse::Failure(err) => {
                assert_eq!(err.code, "price_parse");
                assert_eq!(err.status, 422);
                assert_eq!(err.state, PipelineState::QuestionsGenerated);
            }
            GenerateResponse::Success(_) => panic!("expected failure"),
        }
    }
}
