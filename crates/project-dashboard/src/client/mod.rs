//! Upstream HTTP clients
//!
//! One `reqwest::Client` per external system, built once and shared read-only by every
//! concurrent probe.

mod github;
mod health;
mod heroku;

pub use github::GithubClient;
pub use health::HealthClient;
pub use heroku::HerokuClient;

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Client errors
///
/// `Display` output is what ends up in a probe's `{"error": ...}` entry.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to create HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    /// HTTP status reported by the upstream, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status(status) | ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else if err.is_builder() {
            ClientError::Build(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

fn build_http_client(
    user_agent: &str,
    timeout: Duration,
    headers: HeaderMap,
) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Build(e.to_string()))
}

fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
