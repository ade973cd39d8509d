//! Validated analysis input.

use thiserror::Error;

/// Longest accepted text, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Most texts accepted in one batch.
pub const MAX_BATCH_SIZE: usize = 10;

/// Rejection of a request before it reaches the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Text cannot be empty or just whitespace")]
    Empty,

    #[error("Text must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Maximum {max} texts allowed per batch")]
    BatchTooLarge { max: usize, actual: usize },
}

impl RequestError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_TEXT",
            Self::TooLong { .. } => "TEXT_TOO_LONG",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
        }
    }
}

/// Text to analyze: trimmed, non-empty, at most [`MAX_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    text: String,
}

impl AnalysisRequest {
    pub fn new(text: &str) -> Result<Self, RequestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::Empty);
        }

        let actual = text.chars().count();
        if actual > MAX_TEXT_CHARS {
            return Err(RequestError::TooLong {
                max: MAX_TEXT_CHARS,
                actual,
            });
        }

        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Validate a batch: at most [`MAX_BATCH_SIZE`] entries, blank entries skipped.
///
/// Returns the surviving requests in input order.
pub fn validate_batch<S: AsRef<str>>(texts: &[S]) -> Result<Vec<AnalysisRequest>, RequestError> {
    if texts.len() > MAX_BATCH_SIZE {
        return Err(RequestError::BatchTooLarge {
            max: MAX_BATCH_SIZE,
            actual: texts.len(),
        });
    }

    texts
        .iter()
        .map(AsRef::as_ref)
        .filter(|text| !text.trim().is_empty())
        .map(AnalysisRequest::new)
        .collect()
}
