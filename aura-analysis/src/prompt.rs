//! Instruction prompt for the inference call.

use crate::lexicon::{lexicon, Lexicon};
use crate::model::{keyword_cap, Emotion, SentimentType};
use std::fmt::Write;

/// Bumped whenever the rendered template changes.
pub const PROMPT_VERSION: &str = "3";

/// System instruction sent with every analysis request.
pub const SYSTEM_PROMPT: &str =
    "You are a sentiment analysis expert. Always respond with valid JSON only, no additional text.";

/// Rendered prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub system: &'static str,
    pub user: String,
}

/// Renders analysis prompts. Pure: same text, same prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    lexicon: &'static Lexicon,
    exemplars_per_emotion: usize,
    max_keywords: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(5)
    }
}

impl PromptBuilder {
    pub fn new(max_keywords: usize) -> Self {
        Self {
            lexicon: lexicon(),
            exemplars_per_emotion: 5,
            max_keywords: keyword_cap(max_keywords),
        }
    }

    pub fn build(&self, text: &str) -> AnalysisPrompt {
        AnalysisPrompt {
            system: SYSTEM_PROMPT,
            user: self.render(text),
        }
    }

    fn render(&self, text: &str) -> String {
        let emotions = join_labels(Emotion::ALL.iter().map(|e| e.as_str()));
        let sentiment_types = join_labels(SentimentType::ALL.iter().map(|t| t.as_str()));

        let mut prompt = String::with_capacity(text.len() + 1600);
        prompt.push_str("Analyze the following text for emotional content and provide sentiment analysis.\n\n");
        let _ = writeln!(prompt, "Text to analyze: \"{text}\"\n");

        prompt.push_str("Provide the following information:\n");
        prompt.push_str("1. sentiment: a precise float between -1.0 (very negative) and 1.0 (very positive)\n");
        let _ = writeln!(prompt, "2. sentiment_type: exactly one of {sentiment_types}");
        prompt.push_str("3. energy: a float between 0.0 (calm, low energy) and 1.0 (excited, high energy)\n");
        let _ = writeln!(
            prompt,
            "4. keywords: 1 to {} short keywords or phrases that capture the essence of the text",
            self.max_keywords
        );
        let _ = writeln!(prompt, "5. dominant_emotion: exactly one of {emotions}\n");

        prompt.push_str("Vocabulary hints for each emotion:\n");
        for emotion in Emotion::SCORED {
            let words = self.lexicon.exemplars(emotion, self.exemplars_per_emotion);
            let _ = writeln!(prompt, "- {}: {}", emotion, words.join(", "));
        }
        prompt.push('\n');

        prompt.push_str("Consider the overall tone, emotional intensity, context and nuance, word choice, ");
        prompt.push_str("and punctuation (exclamation marks and capital letters indicate higher energy).\n\n");

        prompt.push_str("Respond ONLY with a single JSON object in exactly this format:\n");
        prompt.push_str("{\n");
        prompt.push_str("  \"sentiment\": -0.5,\n");
        prompt.push_str("  \"sentiment_type\": \"negative\",\n");
        prompt.push_str("  \"energy\": 0.7,\n");
        prompt.push_str("  \"keywords\": [\"keyword1\", \"keyword2\", \"keyword3\"],\n");
        prompt.push_str("  \"dominant_emotion\": \"sadness\"\n");
        prompt.push_str("}\n\n");
        prompt.push_str("All values must be within the ranges above and all labels must come from the listed sets.\n");
        prompt.push_str("Do not include any explanation or text outside the JSON object.");

        prompt
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels
        .map(|l| format!("\"{l}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
