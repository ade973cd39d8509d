//! Inference orchestration with bounded retries and a guaranteed fallback.
//!
//! Each request moves through an explicit state machine:
//!
//! ```text
//! Attempting --ok--> Succeeded
//! Attempting --err, attempts left--> Retrying(delay) --sleep--> Attempting
//! Attempting --err, none left--> Exhausted --> fallback result
//! ```
//!
//! Failures never escape [`SentimentAnalyzer::analyze`]. Every valid request
//! yields an [`AnalysisResult`].

use crate::error::AnalysisError;
use crate::fallback::FallbackAnalyzer;
use crate::model::AnalysisResult;
use crate::normalizer::ResponseNormalizer;
use crate::prompt::{AnalysisPrompt, PromptBuilder};
use crate::provider::{ChatRequest, Provider};
use crate::request::AnalysisRequest;
use aura_common::Config;
use std::sync::Arc;
use std::time::Duration;

/// Decoding parameters for analysis calls.
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: i64 = 200;

/// Retry settings for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Time bound applied to each attempt independently.
    pub timeout_per_attempt: Duration,
    /// Delay after the k-th failed attempt is `backoff_base_secs^k` seconds.
    pub backoff_base_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_per_attempt: Duration::from_secs(30),
            backoff_base_secs: 2,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &aura_common::LlmConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            timeout_per_attempt: config.timeout(),
            backoff_base_secs: config.backoff_base_secs,
        }
    }

    /// Sleep before the attempt following failed attempt number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base_secs.saturating_pow(attempt))
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    Exhausted,
}

/// Per-request attempt bookkeeping. Created fresh for each analysis.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    policy: RetryPolicy,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { attempt: 0, policy }
    }

    /// Number of attempts that have failed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    pub fn timeout_per_attempt(&self) -> Duration {
        self.policy.timeout_per_attempt
    }

    pub fn record_failure(&mut self) -> RetryDecision {
        self.attempt += 1;
        if self.attempt < self.policy.max_attempts {
            RetryDecision::Retry(self.policy.backoff_delay(self.attempt))
        } else {
            RetryDecision::Exhausted
        }
    }
}

#[derive(Debug)]
enum State {
    Attempting,
    Retrying(Duration),
    Succeeded(AnalysisResult),
    Exhausted,
}

/// Top-level analysis entry point.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
pub struct SentimentAnalyzer {
    provider: Arc<dyn Provider>,
    model: String,
    policy: RetryPolicy,
    prompt: PromptBuilder,
    normalizer: ResponseNormalizer,
    fallback: FallbackAnalyzer,
}

impl SentimentAnalyzer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            policy: RetryPolicy::default(),
            prompt: PromptBuilder::default(),
            normalizer: ResponseNormalizer::default(),
            fallback: FallbackAnalyzer::default(),
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Self {
        Self::new(provider, config.llm.model.clone())
            .with_policy(RetryPolicy::from_config(&config.llm))
            .with_max_keywords(config.analysis.max_keywords)
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Keyword cap shared by the prompt, the normalizer and the fallback.
    /// Clamped into `1..=MAX_KEYWORDS`.
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.prompt = PromptBuilder::new(max_keywords);
        self.normalizer = ResponseNormalizer::new(max_keywords);
        self.fallback = FallbackAnalyzer::new(max_keywords);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The deterministic classifier used once retries run out.
    pub fn fallback(&self) -> &FallbackAnalyzer {
        &self.fallback
    }

    /// Analyze one request. Never fails.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let text = request.text();
        let prompt = self.prompt.build(text);
        let mut retry = RetryState::new(self.policy.clone());
        let mut state = State::Attempting;

        loop {
            state = match state {
                State::Attempting => {
                    tracing::debug!(
                        attempt = retry.attempt() + 1,
                        max_attempts = retry.max_attempts(),
                        model = %self.model,
                        "Starting analysis attempt"
                    );
                    match self.attempt(&prompt, retry.timeout_per_attempt()).await {
                        Ok(result) => State::Succeeded(result),
                        Err(e) => on_failure(&mut retry, &e),
                    }
                }
                State::Retrying(delay) => {
                    tokio::time::sleep(delay).await;
                    State::Attempting
                }
                State::Succeeded(result) => {
                    tracing::info!(
                        attempts = retry.attempt() + 1,
                        sentiment = result.sentiment,
                        emotion = %result.dominant_emotion,
                        "Analysis completed"
                    );
                    return result;
                }
                State::Exhausted => {
                    let result = self.fallback.analyze(text);
                    tracing::info!(
                        attempts = retry.attempt(),
                        sentiment = result.sentiment,
                        emotion = %result.dominant_emotion,
                        "Inference unavailable, returning lexicon fallback result"
                    );
                    return result;
                }
            };
        }
    }

    /// Analyze requests one after another, preserving order.
    pub async fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Vec<AnalysisResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.analyze(request).await);
        }
        results
    }

    async fn attempt(&self, prompt: &AnalysisPrompt, timeout: Duration) -> Result<AnalysisResult, AnalysisError> {
        let mut request = ChatRequest::new(self.model.clone(), prompt.user.clone());
        request.system = Some(prompt.system.to_string());
        request.temperature = Some(TEMPERATURE);
        request.max_tokens = Some(MAX_TOKENS);
        request.n = Some(1);
        request.json_response = true;

        let response = tokio::time::timeout(timeout, self.provider.chat(request))
            .await
            .map_err(|_| AnalysisError::Timeout(timeout))??;

        self.normalizer.normalize_content(&response.content)
    }
}

fn on_failure(retry: &mut RetryState, e: &AnalysisError) -> State {
    let failed = retry.attempt() + 1;
    match retry.record_failure() {
        RetryDecision::Retry(delay) => {
            tracing::warn!(
                attempt = failed,
                max_attempts = retry.max_attempts(),
                kind = e.kind(),
                delay_ms = delay.as_millis() as u64,
                error = %e,
                "Analysis attempt failed, retrying"
            );
            State::Retrying(delay)
        }
        RetryDecision::Exhausted => {
            tracing::error!(
                attempt = failed,
                max_attempts = retry.max_attempts(),
                kind = e.kind(),
                error = %e,
                "Analysis attempt failed, no attempts left"
            );
            State::Exhausted
        }
    }
}
