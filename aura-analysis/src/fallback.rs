//! Deterministic, network-free classifier.
//!
//! Used when the inference provider cannot produce a result. Pure and total:
//! the same text always yields the same schema-complete [`AnalysisResult`].

use crate::lexicon::{is_generic, is_intensifier, is_stop_word, lexicon, Lexicon};
use crate::model::{keyword_cap, AnalysisResult, Emotion, SentimentType};
use aura_common::util::round_to;

const ENERGY_BASELINE: f64 = 0.3;
const ENERGY_FLOOR: f64 = 0.1;
const INTENSIFIER_ENERGY: f64 = 0.2;
const EXCLAMATION_ENERGY: f64 = 0.15;
const QUESTION_ENERGY: f64 = 0.1;
const SHOUTING_ENERGY: f64 = 0.3;
const SHOUTING_NEGATIVE_PENALTY: f64 = 0.2;

const SURPRISE_AFTER_POSITIVE: f64 = 0.2;
const SURPRISE_AFTER_NEGATIVE: f64 = -0.15;

/// Scores with a magnitude up to this count as neutral for surprise handling.
pub const NEAR_ZERO: f64 = 0.1;
/// Sentiment assigned to surprise when the text is otherwise neutral.
pub const SURPRISE_FLOOR: f64 = 0.2;
const SURPRISE_SCALE: f64 = 1.2;

const PROMOTION_TOKEN: &str = "promoted";
const HAPPINESS_TOKENS: &[&str] = &["happy", "happier"];
const PROMOTION_SENTIMENT: f64 = 0.8;
const PROMOTION_ENERGY: f64 = 0.7;
const PROMOTION_KEYWORDS: &[&str] = &["promoted", "happier", "work"];

const MIN_KEYWORD_CHARS: usize = 4;
const PLACEHOLDER_KEYWORDS: &[&str] = &["general", "text"];

/// Lexicon-driven sentiment classifier.
#[derive(Debug, Clone)]
pub struct FallbackAnalyzer {
    lexicon: &'static Lexicon,
    max_keywords: usize,
}

impl Default for FallbackAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}

#[derive(Debug, Default)]
struct EmotionCounts([u32; 6]);

impl EmotionCounts {
    fn bump(&mut self, emotion: Emotion) {
        if let Some(idx) = Emotion::SCORED.iter().position(|e| *e == emotion) {
            self.0[idx] += 1;
        }
    }

    /// Highest count wins; ties go to the earlier category; all zero is neutral.
    fn dominant(&self) -> Emotion {
        let mut best = Emotion::Neutral;
        let mut best_count = 0;
        for (emotion, &count) in Emotion::SCORED.iter().zip(self.0.iter()) {
            if count > best_count {
                best = *emotion;
                best_count = count;
            }
        }
        best
    }
}

impl FallbackAnalyzer {
    pub fn new(max_keywords: usize) -> Self {
        Self {
            lexicon: lexicon(),
            max_keywords: keyword_cap(max_keywords),
        }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let raw_tokens: Vec<&str> = text.split_whitespace().collect();
        let tokens: Vec<String> = raw_tokens
            .iter()
            .map(|t| strip_punctuation(t).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if is_promotion(&tokens) {
            return self.promotion_result();
        }

        let mut counts = EmotionCounts::default();
        let mut sentiment = 0.0_f64;
        let mut energy = ENERGY_BASELINE;
        let mut keywords: Vec<String> = Vec::new();

        for token in &tokens {
            if let Some(entry) = self.lexicon.lookup(token) {
                counts.bump(entry.category);
                sentiment += match entry.category {
                    Emotion::Surprise => surprise_weight(sentiment, entry.weight),
                    _ => entry.weight,
                };
                if !is_generic(token) && !keywords.contains(token) {
                    keywords.push(token.clone());
                }
            }
            if is_intensifier(token) {
                energy = (energy + INTENSIFIER_ENERGY).min(1.0);
            }
        }

        let exclamations = text.matches('!').count() as f64;
        energy = (energy + exclamations * EXCLAMATION_ENERGY).min(1.0);
        if text.contains('?') {
            energy = (energy + QUESTION_ENERGY).min(1.0);
        }
        if raw_tokens.iter().any(|t| is_shouting(t)) {
            energy = (energy + SHOUTING_ENERGY).min(1.0);
            if sentiment < 0.0 {
                sentiment -= SHOUTING_NEGATIVE_PENALTY;
            }
        }

        let dominant = counts.dominant();
        if dominant == Emotion::Surprise {
            sentiment = if sentiment.abs() <= NEAR_ZERO {
                SURPRISE_FLOOR
            } else {
                sentiment * SURPRISE_SCALE
            };
        }

        let sentiment = round_to(sentiment.clamp(-1.0, 1.0), 3);
        let energy = round_to(energy.clamp(ENERGY_FLOOR, 1.0), 3);

        keywords.truncate(self.max_keywords);
        if keywords.is_empty() {
            keywords = self.salient_tokens(&tokens);
        }

        let result = AnalysisResult {
            sentiment,
            sentiment_type: SentimentType::from_sentiment(sentiment),
            energy,
            keywords,
            dominant_emotion: dominant,
        };

        tracing::debug!(
            sentiment = result.sentiment,
            dominant_emotion = %result.dominant_emotion,
            keywords = result.keywords.len(),
            "Fallback analysis complete"
        );

        result
    }

    fn promotion_result(&self) -> AnalysisResult {
        AnalysisResult {
            sentiment: PROMOTION_SENTIMENT,
            sentiment_type: SentimentType::from_sentiment(PROMOTION_SENTIMENT),
            energy: PROMOTION_ENERGY,
            keywords: self.capped(PROMOTION_KEYWORDS),
            dominant_emotion: Emotion::Joy,
        }
    }

    /// Longest non-stop-word tokens first, for texts with no lexicon hits.
    fn salient_tokens(&self, tokens: &[String]) -> Vec<String> {
        let mut candidates: Vec<&String> = tokens
            .iter()
            .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|t| t.chars().any(char::is_alphabetic))
            .filter(|t| !is_stop_word(t))
            .collect();
        // Stable: equal lengths keep text order.
        candidates.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let mut keywords: Vec<String> = Vec::new();
        for candidate in candidates {
            if keywords.len() == self.max_keywords {
                break;
            }
            if !keywords.contains(candidate) {
                keywords.push(candidate.clone());
            }
        }

        if keywords.is_empty() {
            return self.capped(PLACEHOLDER_KEYWORDS);
        }
        keywords
    }

    fn capped(&self, words: &[&str]) -> Vec<String> {
        words
            .iter()
            .take(self.max_keywords)
            .map(|w| (*w).to_string())
            .collect()
    }
}

/// Trims any non-alphanumeric edge, so curly quotes and `…` go too; inner
/// apostrophes survive ("i'm").
fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_promotion(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t == PROMOTION_TOKEN)
        && tokens.iter().any(|t| HAPPINESS_TOKENS.contains(&t.as_str()))
}

/// Surprise leans with whatever the text already established.
fn surprise_weight(running: f64, neutral_weight: f64) -> f64 {
    if running > 0.0 {
        SURPRISE_AFTER_POSITIVE
    } else if running < 0.0 {
        SURPRISE_AFTER_NEGATIVE
    } else {
        neutral_weight
    }
}

/// All-caps word of two or more characters, e.g. "STOP" or "WHY?!".
fn is_shouting(raw: &str) -> bool {
    let word = strip_punctuation(raw);
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}
