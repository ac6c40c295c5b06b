//! Plain HTTP client for URL health checks

use reqwest::header::HeaderMap;
use std::time::Duration;

use super::{build_http_client, ClientError};
use crate::config::DashboardConfig;

/// Unauthenticated client issuing `HEAD` requests against arbitrary URLs
#[derive(Debug, Clone)]
pub struct HealthClient {
    http: reqwest::Client,
}

impl HealthClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http_client(user_agent, timeout, HeaderMap::new())?,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.user_agent,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Issue a `HEAD` request and return the status code, whatever it is
    pub async fn head(&self, url: &str) -> Result<u16, ClientError> {
        let response = self.http.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}
