//! Process-wide request counters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Rate calculations treat shorter uptimes as this many hours.
const MIN_UPTIME_HOURS: f64 = 0.01;

/// Request totals and uptime. Created once at startup.
#[derive(Debug)]
pub struct ServiceMetrics {
    total_requests: AtomicU64,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view served by `/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub uptime_seconds: f64,
    pub uptime_hours: f64,
    pub start_time: String,
    pub current_time: String,
    pub requests_per_hour: f64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn record_request(&self) -> u64 {
        self.total_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_requests = self.total_requests();
        let uptime_seconds = self.uptime().as_secs_f64();
        let uptime_hours = uptime_seconds / 3600.0;

        MetricsSnapshot {
            total_requests,
            uptime_seconds: round2(uptime_seconds),
            uptime_hours: round2(uptime_hours),
            start_time: self.started_at.to_rfc3339(),
            current_time: Utc::now().to_rfc3339(),
            requests_per_hour: round2(total_requests as f64 / uptime_hours.max(MIN_UPTIME_HOURS)),
        }
    }
}

fn round2(value: f64) -> f64 {
    aura_common::util::round_to(value, 2)
}
