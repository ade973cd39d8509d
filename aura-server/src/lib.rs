//! aura-server - HTTP front end for Sentiment Aura text analysis.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod metrics;
pub mod routes;

pub use error::ApiError;
pub use metrics::{MetricsSnapshot, ServiceMetrics};
pub use routes::{build_router, cors_layer, AppState, ServiceInfo};
