//! GitHub REST API client

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{build_http_client, trim_base_url, ClientError};
use crate::config::DashboardConfig;
use crate::contracts::{
    GhCommit, GhDeployment, GhDeploymentStatus, GhIssue, GhPullRequest, GhWorkflowRunsPage,
    GithubRepo,
};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the subset of the GitHub REST API the dashboard reads
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        Ok(Self {
            http: build_http_client(user_agent, timeout, headers)?,
            base_url: trim_base_url(base_url),
            token,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ClientError> {
        Self::new(
            config.github_api_url.clone(),
            config.credentials.github_token().map(str::to_string),
            &config.user_agent,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `GET /repos/{owner}/{repo}/commits`
    pub async fn list_commits(
        &self,
        repo: &GithubRepo,
        per_page: usize,
    ) -> Result<Vec<GhCommit>, ClientError> {
        self.get_json(
            &format!("/repos/{}/{}/commits", repo.owner, repo.repo),
            &[("per_page", per_page.to_string())],
        )
        .await
    }

    /// `GET /repos/{owner}/{repo}/pulls`, most recently updated first
    pub async fn list_pull_requests(
        &self,
        repo: &GithubRepo,
        state: &str,
        per_page: usize,
    ) -> Result<Vec<GhPullRequest>, ClientError> {
        self.get_json(
            &format!("/repos/{}/{}/pulls", repo.owner, repo.repo),
            &[
                ("state", state.to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }

    /// `GET /repos/{owner}/{repo}/issues`, most recently updated first
    ///
    /// The response still contains pull requests; callers filter them out.
    pub async fn list_issues(
        &self,
        repo: &GithubRepo,
        state: &str,
        labels: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<GhIssue>, ClientError> {
        let mut query = vec![
            ("state", state.to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(labels) = labels.filter(|l| !l.is_empty()) {
            query.push(("labels", labels.to_string()));
        }

        self.get_json(&format!("/repos/{}/{}/issues", repo.owner, repo.repo), &query)
            .await
    }

    /// `GET /repos/{owner}/{repo}/actions/runs`
    pub async fn list_workflow_runs(
        &self,
        repo: &GithubRepo,
        per_page: usize,
    ) -> Result<GhWorkflowRunsPage, ClientError> {
        self.get_json(
            &format!("/repos/{}/{}/actions/runs", repo.owner, repo.repo),
            &[("per_page", per_page.to_string())],
        )
        .await
    }

    /// `GET /repos/{owner}/{repo}/deployments`
    pub async fn list_deployments(
        &self,
        repo: &GithubRepo,
        per_page: usize,
    ) -> Result<Vec<GhDeployment>, ClientError> {
        self.get_json(
            &format!("/repos/{}/{}/deployments", repo.owner, repo.repo),
            &[("per_page", per_page.to_string())],
        )
        .await
    }

    /// `GET /repos/{owner}/{repo}/deployments/{id}/statuses`
    pub async fn list_deployment_statuses(
        &self,
        repo: &GithubRepo,
        deployment_id: u64,
        per_page: usize,
    ) -> Result<Vec<GhDeploymentStatus>, ClientError> {
        self.get_json(
            &format!(
                "/repos/{}/{}/deployments/{}/statuses",
                repo.owner, repo.repo, deployment_id
            ),
            &[("per_page", per_page.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GitHub request");

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GithubErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unexpected response")
                        .to_string()
                });

            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
