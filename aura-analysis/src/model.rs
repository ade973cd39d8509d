//! Canonical analysis output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Sentiment below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Most keywords a result may carry.
pub const MAX_KEYWORDS: usize = aura_common::validation::KEYWORD_LIMIT;

/// Clamp a requested keyword count into `1..=MAX_KEYWORDS`.
pub fn keyword_cap(requested: usize) -> usize {
    requested.clamp(1, MAX_KEYWORDS)
}

/// Discrete emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    /// Every label, in canonical order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    /// Labels backed by lexicon words. Order decides fallback ties.
    pub const SCORED: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    /// Parse a label case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == label)
    }

    /// Derive an emotion from a clamped sentiment score.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 0.5 {
            Emotion::Joy
        } else if sentiment > 0.0 {
            Emotion::Surprise
        } else if sentiment < -0.5 {
            Emotion::Anger
        } else if sentiment < 0.0 {
            Emotion::Sadness
        } else {
            Emotion::Neutral
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse valence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentType {
    Positive,
    Negative,
    Neutral,
}

impl SentimentType {
    pub const ALL: [SentimentType; 3] = [
        SentimentType::Positive,
        SentimentType::Negative,
        SentimentType::Neutral,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SentimentType::Positive => "positive",
            SentimentType::Negative => "negative",
            SentimentType::Neutral => "neutral",
        }
    }

    /// Parse a label case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }

    /// Bucket a sentiment score.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > POSITIVE_THRESHOLD {
            SentimentType::Positive
        } else if sentiment < NEGATIVE_THRESHOLD {
            SentimentType::Negative
        } else {
            SentimentType::Neutral
        }
    }
}

impl fmt::Display for SentimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured emotional assessment of one text.
///
/// Invariants: `sentiment` in [-1, 1], `energy` in [0, 1], and 1 to 5
/// non-empty trimmed keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: f64,
    pub sentiment_type: SentimentType,
    pub energy: f64,
    pub keywords: Vec<String>,
    pub dominant_emotion: Emotion,
}
