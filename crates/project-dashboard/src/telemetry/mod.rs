//! Telemetry for the Project Dashboard
//!
//! - `metrics` - Prometheus counters and histograms for probes and tool calls

pub mod metrics;

pub use metrics::DashboardMetrics;

use thiserror::Error;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Metrics encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
