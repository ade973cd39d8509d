//! Static word-to-emotion table driving the fallback classifier.
//!
//! Built once on first use and shared read-only afterwards.

use crate::model::Emotion;
use std::collections::HashMap;
use std::sync::OnceLock;

const JOY_WORDS: &[&str] = &[
    "happy", "happier", "happiest", "joy", "joyful", "glad", "love", "loved", "loving",
    "wonderful", "fantastic", "excellent", "amazing", "awesome", "beautiful", "perfect",
    "excited", "exciting", "thrilled", "pleased", "delighted", "cheerful", "thankful",
    "grateful", "blessed", "proud", "great", "good", "best", "fun",
];

const SADNESS_WORDS: &[&str] = &[
    "sad", "sadness", "unhappy", "depressed", "miserable", "lonely", "heartbroken",
    "disappointed", "disappointing", "cry", "crying", "tears", "grief", "hopeless",
    "gloomy", "hurt", "unfortunate", "sorry", "down",
];

const ANGER_WORDS: &[&str] = &[
    "angry", "anger", "furious", "mad", "hate", "hated", "annoyed", "annoying",
    "frustrated", "frustrating", "irritated", "outraged", "rage", "upset", "livid",
];

const FEAR_WORDS: &[&str] = &[
    "afraid", "scared", "fear", "worried", "worry", "anxious", "nervous", "terrified",
    "frightened", "panic", "dread", "scary",
];

const SURPRISE_WORDS: &[&str] = &[
    "surprised", "surprise", "surprising", "shocked", "shocking", "unexpected",
    "astonished", "amazed", "wow", "omg", "unbelievable", "incredible", "suddenly", "whoa",
];

const DISGUST_WORDS: &[&str] = &[
    "disgusting", "disgusted", "gross", "nasty", "revolting", "vile", "yuck", "awful",
    "horrible", "terrible", "ugly", "worst", "bad",
];

/// Words that raise energy regardless of emotion.
pub const INTENSIFIERS: &[&str] = &[
    "very", "extremely", "absolutely", "totally", "completely", "amazing", "incredible",
    "unbelievable", "urgent", "immediately", "wow", "omg", "shocked", "excited", "thrilled",
];

/// Lexicon words too generic to report as keywords.
pub const GENERIC_WORDS: &[&str] = &["good", "bad", "great", "best", "worst", "fun", "down", "sorry"];

/// Words never chosen as fallback keywords.
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "and", "a", "an", "as", "are", "was", "were", "been",
    "be", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
    "may", "might", "must", "shall", "can", "need", "to", "of", "in", "for", "with", "by",
    "from", "about", "into", "through", "during", "before", "after", "this", "that",
    "these", "those", "there", "their", "they", "them", "then", "than", "what", "when",
    "where", "just", "really", "your", "yours", "very", "some",
];

/// Fixed sentiment contribution of one matched word.
///
/// Surprise carries its neutral-context value here; the fallback adjusts it
/// by the sign of the running score.
pub const fn base_weight(category: Emotion) -> f64 {
    match category {
        Emotion::Joy => 0.3,
        Emotion::Sadness => -0.3,
        Emotion::Anger => -0.35,
        Emotion::Fear => -0.25,
        Emotion::Surprise => 0.1,
        Emotion::Disgust => -0.3,
        Emotion::Neutral => 0.0,
    }
}

/// One lexicon word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconEntry {
    pub word: &'static str,
    pub category: Emotion,
    pub weight: f64,
}

/// Immutable word table.
#[derive(Debug)]
pub struct Lexicon {
    entries: HashMap<&'static str, LexiconEntry>,
}

static LEXICON: OnceLock<Lexicon> = OnceLock::new();

/// The process-wide lexicon.
pub fn lexicon() -> &'static Lexicon {
    LEXICON.get_or_init(Lexicon::build)
}

impl Lexicon {
    fn build() -> Self {
        let mut entries = HashMap::new();
        for category in Emotion::SCORED {
            for &word in Self::category_words(category) {
                // First category wins if a word is ever listed twice.
                entries.entry(word).or_insert(LexiconEntry {
                    word,
                    category,
                    weight: base_weight(category),
                });
            }
        }
        Self { entries }
    }

    /// Source words for a category, in curated order.
    pub fn category_words(category: Emotion) -> &'static [&'static str] {
        match category {
            Emotion::Joy => JOY_WORDS,
            Emotion::Sadness => SADNESS_WORDS,
            Emotion::Anger => ANGER_WORDS,
            Emotion::Fear => FEAR_WORDS,
            Emotion::Surprise => SURPRISE_WORDS,
            Emotion::Disgust => DISGUST_WORDS,
            Emotion::Neutral => &[],
        }
    }

    /// Look up a lowercased, punctuation-stripped token.
    pub fn lookup(&self, word: &str) -> Option<&LexiconEntry> {
        self.entries.get(word)
    }

    /// The first `count` curated words of a category.
    pub fn exemplars(&self, category: Emotion, count: usize) -> &'static [&'static str] {
        let words = Self::category_words(category);
        &words[..count.min(words.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn is_intensifier(word: &str) -> bool {
    INTENSIFIERS.contains(&word)
}

pub fn is_generic(word: &str) -> bool {
    GENERIC_WORDS.contains(&word)
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
