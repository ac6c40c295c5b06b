//! Heroku Platform API client

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RANGE};
use std::time::Duration;

use super::{build_http_client, trim_base_url, ClientError};
use crate::config::DashboardConfig;
use crate::contracts::HerokuRelease;

const HEROKU_MEDIA_TYPE: &str = "application/vnd.heroku+json; version=3";

#[derive(Debug, Clone)]
pub struct HerokuClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HerokuClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HEROKU_MEDIA_TYPE));

        Ok(Self {
            http: build_http_client(user_agent, timeout, headers)?,
            base_url: trim_base_url(base_url),
            api_key,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ClientError> {
        Self::new(
            config.heroku_api_url.clone(),
            config.credentials.heroku_api_key().map(str::to_string),
            &config.user_agent,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `GET /apps/{app}/releases`, newest first, at most `limit` entries
    ///
    /// Any non-2xx answer is reported as `HTTP <status>` without reading the body.
    pub async fn list_releases(
        &self,
        app_name: &str,
        limit: usize,
    ) -> Result<Vec<HerokuRelease>, ClientError> {
        let url = format!("{}/apps/{}/releases", self.base_url, app_name);
        tracing::debug!(url = %url, "Heroku request");

        let mut request = self
            .http
            .get(&url)
            .header(RANGE, format!("version ..; order=desc, max={}", limit));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let mut releases: Vec<HerokuRelease> = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        releases.truncate(limit);
        Ok(releases)
    }
}
