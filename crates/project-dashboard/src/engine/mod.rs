//! Multi-source status aggregation engine
//!
//! Resolves a project, runs the relevant probes concurrently under a per-probe timeout and
//! merges every settled outcome into one [`StatusSnapshot`]. A probe failure never cancels
//! its siblings. Nothing is spawned, so dropping a request future abandons all of its
//! outstanding upstream calls.

mod probes;

pub use probes::*;

use futures::future::{join_all, BoxFuture};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};

use crate::client::{GithubClient, HealthClient, HerokuClient};
use crate::config::DashboardConfig;
use crate::contracts::*;
use crate::error::{DashboardError, Result};
use crate::mapper;
use crate::registry::ProjectRegistry;
use crate::telemetry::DashboardMetrics;

pub const DEFAULT_DEPLOYMENT_LIMIT: usize = 10;
pub const DEFAULT_LIST_LIMIT: usize = 20;
/// Upper bound GitHub accepts for `per_page`
pub const MAX_PAGE_SIZE: usize = 100;
/// Deployments whose latest status is looked up
pub const MAX_TRACKED_DEPLOYMENTS: usize = 5;
pub const RECENT_COMMIT_COUNT: usize = 5;

/// Per-request probe parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeParams {
    pub limit: usize,
}

/// A source of status data for one project
///
/// Implementations decide for themselves whether the project is configured for their
/// source (`Skipped`) and fold every upstream fault into `Failure`.
pub trait Probe: Send + Sync {
    /// Source this probe reports for
    fn source(&self) -> Source;

    /// Fetch and normalize this source's data
    fn run<'a>(
        &'a self,
        project: &'a Project,
        params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>>;
}

/// Pull request / issue state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    Open,
    Closed,
    All,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
            ItemState::All => "all",
        }
    }
}

impl std::str::FromStr for ItemState {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ItemState::Open),
            "closed" => Ok(ItemState::Closed),
            "all" => Ok(ItemState::All),
            other => Err(DashboardError::invalid_arguments(format!(
                "state must be one of open, closed, all (got {})",
                other
            ))),
        }
    }
}

/// Resolve a caller-supplied limit: absent or zero means `default`, capped at one page
pub fn normalize_limit(limit: Option<usize>, default: usize) -> usize {
    match limit {
        None | Some(0) => default,
        Some(n) => n.min(MAX_PAGE_SIZE),
    }
}

/// Status aggregation engine
pub struct StatusEngine {
    registry: ProjectRegistry,
    github: Arc<GithubClient>,
    status_probes: Vec<Box<dyn Probe>>,
    deployment_probes: Vec<Box<dyn Probe>>,
    probe_timeout: Duration,
    metrics: Arc<DashboardMetrics>,
}

impl StatusEngine {
    /// Build the engine and its upstream clients from configuration
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        config.validate()?;

        let github = Arc::new(
            GithubClient::from_config(&config).map_err(|e| DashboardError::config(e.to_string()))?,
        );
        let heroku = Arc::new(
            HerokuClient::from_config(&config).map_err(|e| DashboardError::config(e.to_string()))?,
        );
        let health = Arc::new(
            HealthClient::from_config(&config).map_err(|e| DashboardError::config(e.to_string()))?,
        );
        let metrics =
            Arc::new(DashboardMetrics::new().map_err(|e| DashboardError::config(e.to_string()))?);

        let status_probes: Vec<Box<dyn Probe>> = vec![
            Box::new(RepoOverviewProbe::new(github.clone())),
            Box::new(UrlHealthProbe::new(health)),
        ];
        let deployment_probes: Vec<Box<dyn Probe>> = vec![
            Box::new(WorkflowRunsProbe::new(github.clone())),
            Box::new(DeploymentsProbe::new(github.clone())),
            Box::new(HerokuReleasesProbe::new(heroku)),
        ];

        tracing::info!(
            projects = config.projects.len(),
            github_token = config.credentials.github_token().is_some(),
            heroku_api_key = config.credentials.heroku_api_key().is_some(),
            "Status engine configured"
        );

        Ok(Self {
            registry: ProjectRegistry::new(config.projects)?,
            github,
            status_probes,
            deployment_probes,
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            metrics,
        })
    }

    /// Replace the probes run by `get_project_status`
    pub fn with_status_probes(mut self, probes: Vec<Box<dyn Probe>>) -> Self {
        self.status_probes = probes;
        self
    }

    /// Replace the probes run by `get_deployments`
    pub fn with_deployment_probes(mut self, probes: Vec<Box<dyn Probe>>) -> Self {
        self.deployment_probes = probes;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<DashboardMetrics> {
        &self.metrics
    }

    /// Configured projects, optionally filtered by tag
    pub fn list_projects(&self, tag: Option<&str>) -> Vec<ProjectSummary> {
        self.registry
            .list(tag)
            .into_iter()
            .map(ProjectSummary::from)
            .collect()
    }

    /// Repository overview and URL health for one project
    pub async fn get_project_status(&self, project_id: &str) -> Result<StatusSnapshot> {
        let project = self.registry.resolve(project_id)?;
        let params = ProbeParams {
            limit: DEFAULT_DEPLOYMENT_LIMIT,
        };
        Ok(self.run_probes(project, &self.status_probes, params).await)
    }

    /// Workflow runs, GitHub deployments and Heroku releases for one project
    pub async fn get_deployments(
        &self,
        project_id: &str,
        limit: Option<usize>,
    ) -> Result<StatusSnapshot> {
        let project = self.registry.resolve(project_id)?;
        let params = ProbeParams {
            limit: normalize_limit(limit, DEFAULT_DEPLOYMENT_LIMIT),
        };
        Ok(self.run_probes(project, &self.deployment_probes, params).await)
    }

    /// Pull requests, most recently updated first
    pub async fn list_prs(
        &self,
        project_id: &str,
        state: ItemState,
        limit: Option<usize>,
    ) -> Result<Vec<PullRequestRecord>> {
        let repo = self.github_repo(project_id)?;
        let pulls = self
            .github
            .list_pull_requests(repo, state.as_str(), normalize_limit(limit, DEFAULT_LIST_LIMIT))
            .await
            .map_err(|e| DashboardError::upstream("PRs", e))?;

        Ok(pulls.iter().map(mapper::pull_request_record).collect())
    }

    /// Issues, most recently updated first, with pull requests removed
    pub async fn list_issues(
        &self,
        project_id: &str,
        state: ItemState,
        labels: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<IssueRecord>> {
        let repo = self.github_repo(project_id)?;
        let labels = labels.join(",");
        let issues = self
            .github
            .list_issues(
                repo,
                state.as_str(),
                Some(labels.as_str()),
                normalize_limit(limit, DEFAULT_LIST_LIMIT),
            )
            .await
            .map_err(|e| DashboardError::upstream("issues", e))?;

        Ok(mapper::exclude_pull_requests(issues)
            .iter()
            .map(mapper::issue_record)
            .collect())
    }

    fn github_repo(&self, project_id: &str) -> Result<&GithubRepo> {
        let project = self.registry.resolve(project_id)?;
        let repo = project
            .github
            .as_ref()
            .ok_or_else(|| DashboardError::NotConfigured {
                project: project.id.clone(),
                integration: "GitHub",
            })?;
        if !self.github.has_token() {
            return Err(DashboardError::CredentialMissing(
                DashboardError::NO_GITHUB_TOKEN,
            ));
        }
        Ok(repo)
    }

    async fn run_probes(
        &self,
        project: &Project,
        probes: &[Box<dyn Probe>],
        params: ProbeParams,
    ) -> StatusSnapshot {
        let outcomes = join_all(
            probes
                .iter()
                .map(|probe| self.run_probe(probe.as_ref(), project, params)),
        )
        .await;

        let snapshot = StatusSnapshot::assemble(project.reference(), outcomes);
        tracing::info!(
            project_id = %project.id,
            sources = snapshot.len(),
            failures = snapshot.failure_count(),
            "Probes settled"
        );
        snapshot
    }

    async fn run_probe(
        &self,
        probe: &dyn Probe,
        project: &Project,
        params: ProbeParams,
    ) -> (Source, ProbeResult<SourcePayload>) {
        let source = probe.source();
        let start = Instant::now();

        let result = match timeout(self.probe_timeout, probe.run(project, params)).await {
            Ok(result) => result,
            Err(_) => ProbeResult::failure(format!(
                "Probe timed out after {}ms",
                self.probe_timeout.as_millis()
            )),
        };

        let elapsed = start.elapsed();
        match &result {
            ProbeResult::Failure(reason) => tracing::warn!(
                project_id = %project.id,
                source = %source,
                error = %reason,
                duration_ms = elapsed.as_millis() as u64,
                "Probe failed"
            ),
            other => tracing::debug!(
                project_id = %project.id,
                source = %source,
                outcome = other.outcome(),
                duration_ms = elapsed.as_millis() as u64,
                "Probe settled"
            ),
        }
        self.metrics.record_probe(source, result.outcome(), elapsed);

        (source, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probe with a canned outcome and an optional delay
    struct FixedProbe {
        source: Source,
        result: ProbeResult<SourcePayload>,
        delay: Option<Duration>,
    }

    impl FixedProbe {
        fn boxed(source: Source, result: ProbeResult<SourcePayload>) -> Box<dyn Probe> {
            Box::new(Self {
                source,
                result,
                delay: None,
            })
        }
    }

    impl Probe for FixedProbe {
        fn source(&self) -> Source {
            self.source
        }

        fn run<'a>(
            &'a self,
            _project: &'a Project,
            _params: ProbeParams,
        ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
            Box::pin(async move {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.result.clone()
            })
        }
    }

    fn engine(projects: Vec<Project>) -> StatusEngine {
        StatusEngine::from_config(DashboardConfig::new(projects)).unwrap()
    }

    fn releases() -> SourcePayload {
        SourcePayload::Releases(HerokuReleases {
            app_name: "web-prod".to_string(),
            releases: vec![],
        })
    }

    #[test]
    fn test_normalize_limit() {
        assert_eq!(normalize_limit(None, 10), 10);
        assert_eq!(normalize_limit(Some(0), 20), 20);
        assert_eq!(normalize_limit(Some(3), 20), 3);
        assert_eq!(normalize_limit(Some(500), 20), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_item_state_parse() {
        assert_eq!("Closed".parse::<ItemState>().unwrap(), ItemState::Closed);
        assert!("merged".parse::<ItemState>().is_err());
        assert_eq!(ItemState::default().as_str(), "open");
    }

    #[tokio::test]
    async fn test_probe_failures_are_independent() {
        let engine = engine(vec![Project::new("x", "X")]).with_deployment_probes(vec![
            FixedProbe::boxed(Source::Github, ProbeResult::failure("HTTP 502")),
            FixedProbe::boxed(
                Source::GithubDeployments,
                ProbeResult::Success(SourcePayload::Deployments(vec![])),
            ),
            FixedProbe::boxed(Source::Heroku, ProbeResult::Success(releases())),
            FixedProbe::boxed(Source::Health, ProbeResult::failure("connection refused")),
        ]);

        let snapshot = engine.get_deployments("x", None).await.unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.failure_count(), 2);
        assert_eq!(snapshot.success_count(), 2);
        assert_eq!(
            snapshot.get(Source::Github),
            Some(&ProbeResult::failure("HTTP 502"))
        );
    }

    #[tokio::test]
    async fn test_skipped_probes_leave_no_entry() {
        let engine = engine(vec![Project::new("x", "X")]).with_status_probes(vec![
            FixedProbe::boxed(Source::Github, ProbeResult::skipped("no GitHub integration")),
            FixedProbe::boxed(Source::Health, ProbeResult::skipped("no health URLs")),
        ]);

        let snapshot = engine.get_project_status("x").await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.project().id, "x");
    }

    #[tokio::test]
    async fn test_probe_timeout_becomes_failure() {
        let slow: Box<dyn Probe> = Box::new(FixedProbe {
            source: Source::Heroku,
            result: ProbeResult::Success(releases()),
            delay: Some(Duration::from_secs(5)),
        });
        let engine = engine(vec![Project::new("x", "X")])
            .with_deployment_probes(vec![slow])
            .with_probe_timeout(Duration::from_millis(20));

        let snapshot = engine.get_deployments("x", Some(5)).await.unwrap();
        let result = snapshot.get(Source::Heroku).unwrap();
        assert!(result.is_failure());
        assert!(result.reason().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_unknown_project_runs_no_probes() {
        let engine = engine(vec![]);
        let err = engine.get_project_status("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found: ghost");
        assert!(!engine
            .metrics()
            .encode_text()
            .unwrap()
            .contains("probe_outcomes_total{"));
    }

    #[tokio::test]
    async fn test_list_prs_terminal_errors() {
        let engine = engine(vec![
            Project::new("docs", "Docs"),
            Project::new("api", "API").with_github("acme", "api"),
        ]);

        let err = engine
            .list_prs("docs", ItemState::Open, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Project docs has no GitHub integration");

        let err = engine
            .list_issues("api", ItemState::All, &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No GitHub token configured");
    }

    #[test]
    fn test_list_projects_by_tag() {
        let engine = engine(vec![
            Project::new("api", "API").with_github("acme", "api").with_tag("backend"),
            Project::new("web", "Web").with_heroku("web-prod"),
        ]);

        let summaries = engine.list_projects(Some("backend"));
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].integrations.github);
        assert_eq!(engine.list_projects(None).len(), 2);
    }
}
