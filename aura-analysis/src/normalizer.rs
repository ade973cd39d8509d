//! Turns an untrusted structured payload into a canonical [`AnalysisResult`].
//!
//! Rules run in a fixed order because later ones read earlier results:
//!
//! 1. `sentiment`: coerce to float (default 0), clamp to [-1, 1]
//! 2. `dominant_emotion`: keep if valid, else derive from sentiment
//! 3. surprise with |sentiment| < 0.1 becomes +0.2
//! 4. `sentiment_type`: keep if valid, else derive from (adjusted) sentiment
//! 5. `energy`: coerce to float (default 0.5), clamp to [0, 1]
//! 6. `keywords`: non-empty trimmed strings, capped; `["general"]` if none remain
//!
//! Emotion and type are derived independently and may disagree on malformed
//! input. That is accepted.

use crate::error::AnalysisError;
use crate::model::{keyword_cap, AnalysisResult, Emotion, SentimentType};
use serde::Deserialize;

const DEFAULT_SENTIMENT: f64 = 0.0;
const DEFAULT_ENERGY: f64 = 0.5;
const SURPRISE_NEUTRAL_BAND: f64 = 0.1;
const SURPRISE_BIAS: f64 = 0.2;
const PLACEHOLDER_KEYWORD: &str = "general";

/// A JSON scalar as the model sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Scalar {
    fn to_f64(&self, field: &str) -> Result<f64, AnalysisError> {
        let value = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                AnalysisError::Validation(format!("{field} is not numeric: {s:?}"))
            })?,
            Scalar::Other(v) => {
                return Err(AnalysisError::Validation(format!(
                    "{field} has unsupported type: {v}"
                )))
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(AnalysisError::Validation(format!("{field} is not finite")))
        }
    }

    fn as_label(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Keyword list entry; anything that is not a string is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KeywordEntry {
    Text(String),
    Other(serde_json::Value),
}

/// The `keywords` field; a non-list value counts as no keywords.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KeywordField {
    List(Vec<KeywordEntry>),
    Other(serde_json::Value),
}

/// Loosely-typed analysis payload. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub sentiment: Option<Scalar>,
    #[serde(default)]
    pub sentiment_type: Option<Scalar>,
    #[serde(default)]
    pub energy: Option<Scalar>,
    #[serde(default)]
    pub keywords: Option<KeywordField>,
    #[serde(default)]
    pub dominant_emotion: Option<Scalar>,
}

impl RawAnalysis {
    /// Parse model output text.
    ///
    /// Tolerates code fences or prose around the object by keeping the span
    /// from the first `{` to the last `}`.
    pub fn from_content(content: &str) -> Result<Self, AnalysisError> {
        let json = extract_object(content).ok_or_else(|| {
            AnalysisError::MalformedPayload(format!(
                "no JSON object in response ({} chars)",
                content.len()
            ))
        })?;

        serde_json::from_str(json).map_err(|e| AnalysisError::MalformedPayload(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, AnalysisError> {
        serde_json::from_value(value).map_err(|e| AnalysisError::MalformedPayload(e.to_string()))
    }
}

impl From<&AnalysisResult> for RawAnalysis {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            sentiment: Some(Scalar::Number(result.sentiment)),
            sentiment_type: Some(Scalar::Text(result.sentiment_type.as_str().into())),
            energy: Some(Scalar::Number(result.energy)),
            keywords: Some(KeywordField::List(
                result
                    .keywords
                    .iter()
                    .cloned()
                    .map(KeywordEntry::Text)
                    .collect(),
            )),
            dominant_emotion: Some(Scalar::Text(result.dominant_emotion.as_str().into())),
        }
    }
}

fn extract_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

/// Clamps and defaults raw payloads into the canonical schema.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    max_keywords: usize,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ResponseNormalizer {
    pub fn new(max_keywords: usize) -> Self {
        Self {
            max_keywords: keyword_cap(max_keywords),
        }
    }

    /// Parse and normalize model output text.
    pub fn normalize_content(&self, content: &str) -> Result<AnalysisResult, AnalysisError> {
        self.normalize(RawAnalysis::from_content(content)?)
    }

    pub fn normalize(&self, raw: RawAnalysis) -> Result<AnalysisResult, AnalysisError> {
        let mut sentiment = match &raw.sentiment {
            Some(value) => value.to_f64("sentiment")?,
            None => DEFAULT_SENTIMENT,
        }
        .clamp(-1.0, 1.0);

        let dominant_emotion = raw
            .dominant_emotion
            .as_ref()
            .and_then(Scalar::as_label)
            .and_then(Emotion::parse)
            .unwrap_or_else(|| Emotion::from_sentiment(sentiment));

        if dominant_emotion == Emotion::Surprise && sentiment.abs() < SURPRISE_NEUTRAL_BAND {
            sentiment = SURPRISE_BIAS;
        }

        let sentiment_type = raw
            .sentiment_type
            .as_ref()
            .and_then(Scalar::as_label)
            .and_then(SentimentType::parse)
            .unwrap_or_else(|| SentimentType::from_sentiment(sentiment));

        let energy = match &raw.energy {
            Some(value) => value.to_f64("energy")?,
            None => DEFAULT_ENERGY,
        }
        .clamp(0.0, 1.0);

        let mut keywords: Vec<String> = match raw.keywords {
            Some(KeywordField::List(entries)) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    KeywordEntry::Text(s) => Some(s.trim().to_string()),
                    KeywordEntry::Other(_) => None,
                })
                .filter(|s| !s.is_empty())
                .take(self.max_keywords)
                .collect(),
            _ => Vec::new(),
        };
        if keywords.is_empty() {
            keywords.push(PLACEHOLDER_KEYWORD.to_string());
        }

        Ok(AnalysisResult {
            sentiment,
            sentiment_type,
            energy,
            keywords,
            dominant_emotion,
        })
    }
}
