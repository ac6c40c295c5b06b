//! Dashboard configuration
//!
//! Built once at process start (normally via [`DashboardConfig::from_env`] in the binary)
//! and handed to the engine by value. Nothing below the binary reads the environment.
//!
//! # Environment
//!
//! - `GITHUB_TOKEN` / `HEROKU_API_KEY`: upstream credentials (optional)
//! - `GITHUB_PROJECTS`: JSON array of project definitions
//! - `GITHUB_PROJECTS_FILE`: path to a JSON or YAML file with the same array
//! - `GITHUB_API_URL` / `HEROKU_API_URL`: API base URLs
//! - `DASHBOARD_REQUEST_TIMEOUT_MS` / `DASHBOARD_PROBE_TIMEOUT_MS`: timeouts

use std::fmt;
use std::path::Path;

use crate::contracts::Project;
use crate::error::{DashboardError, Result};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HEROKU_API_URL: &str = "https://api.heroku.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = concat!("project-dashboard/", env!("CARGO_PKG_VERSION"));

/// Upstream credentials
#[derive(Clone, Default)]
pub struct Credentials {
    github_token: Option<String>,
    heroku_api_key: Option<String>,
}

impl Credentials {
    pub fn new(github_token: Option<String>, heroku_api_key: Option<String>) -> Self {
        Self {
            github_token: github_token.filter(|t| !t.trim().is_empty()),
            heroku_api_key: heroku_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    pub fn heroku_api_key(&self) -> Option<&str> {
        self.heroku_api_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("heroku_api_key", &self.heroku_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Configured projects
    pub projects: Vec<Project>,

    /// Upstream credentials
    pub credentials: Credentials,

    /// GitHub REST API base URL
    pub github_api_url: String,

    /// Heroku Platform API base URL
    pub heroku_api_url: String,

    /// Per-call HTTP timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Overall timeout for one probe in milliseconds
    pub probe_timeout_ms: u64,

    /// User-Agent sent upstream
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            credentials: Credentials::default(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            heroku_api_url: DEFAULT_HEROKU_API_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a config for the given projects with default endpoints
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Default::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// `projects_file` takes precedence over `GITHUB_PROJECTS_FILE` and `GITHUB_PROJECTS`.
    pub fn from_env(projects_file: Option<&Path>) -> Result<Self> {
        let file = projects_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("GITHUB_PROJECTS_FILE").map(Into::into));

        let projects = match file {
            Some(path) => load_projects_file(&path)?,
            None => match std::env::var("GITHUB_PROJECTS") {
                Ok(raw) => parse_projects_json(&raw)?,
                Err(_) => {
                    tracing::warn!("GITHUB_PROJECTS is not set; no projects configured");
                    Vec::new()
                }
            },
        };

        let mut config = Self::new(projects).with_credentials(Credentials::new(
            std::env::var("GITHUB_TOKEN").ok(),
            std::env::var("HEROKU_API_KEY").ok(),
        ));

        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github_api_url = url;
        }
        if let Ok(url) = std::env::var("HEROKU_API_URL") {
            config.heroku_api_url = url;
        }
        config.request_timeout_ms = env_millis(
            "DASHBOARD_REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?;
        config.probe_timeout_ms =
            env_millis("DASHBOARD_PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS)?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }

    pub fn with_heroku_api_url(mut self, url: impl Into<String>) -> Self {
        self.heroku_api_url = url.into();
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_probe_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.probe_timeout_ms = timeout_ms;
        self
    }

    /// Reject configurations the engine cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 || self.probe_timeout_ms == 0 {
            return Err(DashboardError::config("timeouts must be greater than zero"));
        }
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(DashboardError::config("project id must not be empty"));
            }
            if let Some(github) = &project.github {
                if github.owner.is_empty() || github.repo.is_empty() {
                    return Err(DashboardError::config(format!(
                        "project {} has an incomplete GitHub integration",
                        project.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse a JSON array of project definitions
pub fn parse_projects_json(raw: &str) -> Result<Vec<Project>> {
    serde_json::from_str(raw).map_err(|e| {
        DashboardError::config(format!(
            "invalid GITHUB_PROJECTS format, expected JSON array: {}",
            e
        ))
    })
}

/// Load project definitions from a `.json`, `.yaml` or `.yml` file
pub fn load_projects_file(path: &Path) -> Result<Vec<Project>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DashboardError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        parse_projects_json(&content)
    }
}

fn env_millis(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DashboardError::config(format!("{} must be a number of milliseconds", name))),
        Err(_) => Ok(default),
    }
}
