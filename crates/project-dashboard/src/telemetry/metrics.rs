//! Prometheus metrics for the Project Dashboard
//!
//! - `project_dashboard_probe_outcomes_total` (counter) - probe outcomes by source and outcome
//! - `project_dashboard_probe_duration_seconds` (histogram) - probe duration by source
//! - `project_dashboard_tool_calls_total` (counter) - tool invocations by tool and result

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::time::Duration;

use super::{Result, TelemetryError};
use crate::contracts::Source;

const NAMESPACE: &str = "project_dashboard";

/// Dashboard metrics backed by their own registry
pub struct DashboardMetrics {
    registry: Registry,
    probe_outcomes_total: CounterVec,
    probe_duration_seconds: HistogramVec,
    tool_calls_total: CounterVec,
}

impl DashboardMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let probe_outcomes_total = CounterVec::new(
            Opts::new("probe_outcomes_total", "Probe outcomes by source").namespace(NAMESPACE),
            &["source", "outcome"],
        )?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new("probe_duration_seconds", "Probe duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["source"],
        )?;

        let tool_calls_total = CounterVec::new(
            Opts::new("tool_calls_total", "Tool invocations by result").namespace(NAMESPACE),
            &["tool", "result"],
        )?;

        registry.register(Box::new(probe_outcomes_total.clone()))?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;
        registry.register(Box::new(tool_calls_total.clone()))?;

        Ok(Self {
            registry,
            probe_outcomes_total,
            probe_duration_seconds,
            tool_calls_total,
        })
    }

    /// Record one settled probe
    pub fn record_probe(&self, source: Source, outcome: &str, elapsed: Duration) {
        self.probe_outcomes_total
            .with_label_values(&[source.as_str(), outcome])
            .inc();
        self.probe_duration_seconds
            .with_label_values(&[source.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Record one tool invocation
    pub fn record_tool_call(&self, tool: &str, success: bool) {
        let result = if success { "success" } else { "error" };
        self.tool_calls_total
            .with_label_values(&[tool, result])
            .inc();
    }

    /// Encode metrics as text for scraping
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::EncodingError(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::EncodingError(e.to_string()))
    }
}

impl std::fmt::Debug for DashboardMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardMetrics").finish_non_exhaustive()
    }
}
