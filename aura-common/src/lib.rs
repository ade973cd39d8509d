//! Aura Common - Shared configuration, validation, and logging for Sentiment Aura.
//!
//! This crate provides:
//! - Configuration types, file loading, and environment overrides
//! - Configuration validation
//! - Logging setup with noise filtering
//! - Small string utilities used across services

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    AnalysisConfig, Config, CorsConfig, LlmConfig, ObservabilityConfig, ServerConfig,
};
pub use validation::{Validate, ValidationError, ValidationResult};
