//! Aura Analysis - emotional assessment of short free-form text.
//!
//! Produces a bounded, well-formed [`AnalysisResult`] for every valid input:
//! - Builds an instruction prompt and calls an LLM [`Provider`]
//! - Retries timeouts, transport failures, and bad payloads with exponential backoff
//! - Normalizes whatever structured payload comes back into the canonical schema
//! - Falls back to a deterministic lexicon classifier once attempts are exhausted
//!
//! ## Example
//!
//! ```ignore
//! use aura_analysis::{AnalysisRequest, OpenAIProvider, SentimentAnalyzer};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(OpenAIProvider::new(api_key));
//! let analyzer = SentimentAnalyzer::new(provider, "gpt-3.5-turbo");
//!
//! let request = AnalysisRequest::new("I am so happy today!")?;
//! let result = analyzer.analyze(&request).await;
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod fallback;
pub mod lexicon;
pub mod model;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod request;

pub use error::AnalysisError;
pub use fallback::FallbackAnalyzer;
pub use lexicon::{lexicon, Lexicon, LexiconEntry};
pub use model::{AnalysisResult, Emotion, SentimentType};
pub use normalizer::{RawAnalysis, ResponseNormalizer};
pub use orchestrator::{RetryDecision, RetryPolicy, RetryState, SentimentAnalyzer};
pub use prompt::{AnalysisPrompt, PromptBuilder};
pub use provider::{
    ChatRequest, ChatResponse, Message, OpenAIProvider, Provider, ProviderError, TokenUsage,
};
pub use request::{validate_batch, AnalysisRequest, RequestError, MAX_BATCH_SIZE, MAX_TEXT_CHARS};
