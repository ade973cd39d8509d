//! Retryable failure kinds of a single inference attempt.

use crate::provider::ProviderError;
use std::time::Duration;
use thiserror::Error;

/// Why one inference attempt did not produce a result.
///
/// Every kind is retryable. None of them reach the caller of
/// [`SentimentAnalyzer::analyze`](crate::SentimentAnalyzer::analyze); they are
/// logged and then replaced by the fallback result once attempts run out.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The attempt exceeded its time bound.
    #[error("Inference call timed out after {0:?}")]
    Timeout(Duration),

    /// The payload could not be parsed into the expected structure.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A field was present but could not be coerced.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Transport(#[from] ProviderError),
}

impl AnalysisError {
    /// Short kind label for structured logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(AnalysisError::Timeout(Duration::from_secs(1)).kind(), "timeout");
        assert_eq!(AnalysisError::MalformedPayload("x".into()).kind(), "malformed_payload");
        assert_eq!(AnalysisError::Validation("x".into()).kind(), "validation");

        let transport: AnalysisError = ProviderError {
            provider: "openai".into(),
            model: "gpt-4o".into(),
            message: "connection reset".into(),
            status_code: None,
        }
        .into();
        assert_eq!(transport.kind(), "transport");
        assert!(transport.to_string().contains("connection reset"));
    }
}
