//! Source probe implementations
//!
//! Each probe fetches and normalizes one kind of status data for one project and never
//! returns an error: every fault is folded into its `ProbeResult`.

use futures::future::{join_all, BoxFuture};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Probe, ProbeParams, MAX_PAGE_SIZE, MAX_TRACKED_DEPLOYMENTS, RECENT_COMMIT_COUNT};
use crate::client::{GithubClient, HealthClient, HerokuClient};
use crate::contracts::*;
use crate::error::DashboardError;
use crate::mapper;

const NO_GITHUB_INTEGRATION: &str = "no GitHub integration";

/// GitHub repository overview (source `github` of a status document)
pub struct RepoOverviewProbe {
    github: Arc<GithubClient>,
}

impl RepoOverviewProbe {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

impl Probe for RepoOverviewProbe {
    fn source(&self) -> Source {
        Source::Github
    }

    fn run<'a>(
        &'a self,
        project: &'a Project,
        _params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
        Box::pin(async move {
            let Some(repo) = &project.github else {
                return ProbeResult::skipped(NO_GITHUB_INTEGRATION);
            };
            if !self.github.has_token() {
                return ProbeResult::failure(DashboardError::NO_GITHUB_TOKEN);
            }

            let fetched = tokio::try_join!(
                self.github.list_commits(repo, RECENT_COMMIT_COUNT),
                self.github.list_pull_requests(repo, "open", MAX_PAGE_SIZE),
                self.github.list_issues(repo, "open", None, MAX_PAGE_SIZE),
                self.github.list_workflow_runs(repo, 1),
            );

            ProbeResult::from(fetched.map(|(commits, pulls, issues, runs)| {
                SourcePayload::Overview(RepoOverview {
                    recent_commits: commits.iter().map(mapper::commit_summary).collect(),
                    open_prs: pulls.len(),
                    open_issues: mapper::exclude_pull_requests(issues).len(),
                    last_workflow_run: runs
                        .workflow_runs
                        .first()
                        .map(mapper::workflow_run_summary),
                })
            }))
        })
    }
}

/// Recent CI/CD workflow runs (source `github` of a deployments document)
pub struct WorkflowRunsProbe {
    github: Arc<GithubClient>,
}

impl WorkflowRunsProbe {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

impl Probe for WorkflowRunsProbe {
    fn source(&self) -> Source {
        Source::Github
    }

    fn run<'a>(
        &'a self,
        project: &'a Project,
        params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
        Box::pin(async move {
            let Some(repo) = &project.github else {
                return ProbeResult::skipped(NO_GITHUB_INTEGRATION);
            };
            if !self.github.has_token() {
                return ProbeResult::failure(DashboardError::NO_GITHUB_TOKEN);
            }

            let runs = self.github.list_workflow_runs(repo, params.limit).await;
            ProbeResult::from(runs.map(|page| {
                SourcePayload::WorkflowRuns(WorkflowRuns {
                    workflow_runs: page
                        .workflow_runs
                        .iter()
                        .map(mapper::workflow_run_record)
                        .collect(),
                })
            }))
        })
    }
}

/// GitHub Deployments with their latest status (source `githubDeployments`)
pub struct DeploymentsProbe {
    github: Arc<GithubClient>,
}

impl DeploymentsProbe {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }

    async fn with_latest_status(
        &self,
        repo: &GithubRepo,
        deployment: &GhDeployment,
    ) -> DeploymentRecord {
        match self
            .github
            .list_deployment_statuses(repo, deployment.id, 1)
            .await
        {
            Ok(statuses) => mapper::deployment_record(deployment, statuses.first()),
            Err(e) => {
                tracing::warn!(
                    repo = %repo,
                    deployment_id = deployment.id,
                    error = %e,
                    "Deployment status lookup failed"
                );
                mapper::deployment_record(deployment, None)
            }
        }
    }
}

impl Probe for DeploymentsProbe {
    fn source(&self) -> Source {
        Source::GithubDeployments
    }

    fn run<'a>(
        &'a self,
        project: &'a Project,
        params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
        Box::pin(async move {
            let Some(repo) = &project.github else {
                return ProbeResult::skipped(NO_GITHUB_INTEGRATION);
            };
            if !self.github.has_token() {
                return ProbeResult::failure(DashboardError::NO_GITHUB_TOKEN);
            }

            let deployments = match self.github.list_deployments(repo, params.limit).await {
                Ok(deployments) => deployments,
                Err(e) => return ProbeResult::failure(e.to_string()),
            };

            let lookups = deployments
                .iter()
                .take(MAX_TRACKED_DEPLOYMENTS)
                .map(|deployment| self.with_latest_status(repo, deployment));

            ProbeResult::Success(SourcePayload::Deployments(join_all(lookups).await))
        })
    }
}

/// Heroku releases (source `heroku`)
pub struct HerokuReleasesProbe {
    heroku: Arc<HerokuClient>,
}

impl HerokuReleasesProbe {
    pub fn new(heroku: Arc<HerokuClient>) -> Self {
        Self { heroku }
    }
}

impl Probe for HerokuReleasesProbe {
    fn source(&self) -> Source {
        Source::Heroku
    }

    fn run<'a>(
        &'a self,
        project: &'a Project,
        params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
        Box::pin(async move {
            let Some(app) = &project.heroku else {
                return ProbeResult::skipped("no Heroku integration");
            };
            if !self.heroku.has_api_key() {
                return ProbeResult::failure(DashboardError::NO_HEROKU_API_KEY);
            }

            let releases = self.heroku.list_releases(&app.app_name, params.limit).await;
            ProbeResult::from(releases.map(|releases| {
                SourcePayload::Releases(HerokuReleases {
                    app_name: app.app_name.clone(),
                    releases: releases.iter().map(mapper::release_record).collect(),
                })
            }))
        })
    }
}

/// HEAD checks against the project's labelled URLs (source `health`)
pub struct UrlHealthProbe {
    http: Arc<HealthClient>,
}

impl UrlHealthProbe {
    pub fn new(http: Arc<HealthClient>) -> Self {
        Self { http }
    }

    async fn check(&self, label: &str, url: &str) -> (String, UrlHealth) {
        let health = match self.http.head(url).await {
            Ok(status) => UrlHealth::reachable(url, status),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "URL unreachable");
                UrlHealth::unreachable(url)
            }
        };
        (label.to_string(), health)
    }
}

impl Probe for UrlHealthProbe {
    fn source(&self) -> Source {
        Source::Health
    }

    fn run<'a>(
        &'a self,
        project: &'a Project,
        _params: ProbeParams,
    ) -> BoxFuture<'a, ProbeResult<SourcePayload>> {
        Box::pin(async move {
            let targets = project.health_targets();
            if targets.is_empty() {
                return ProbeResult::skipped("no health URLs");
            }

            let checks = targets.into_iter().map(|(label, url)| self.check(label, url));
            let results: BTreeMap<String, UrlHealth> = join_all(checks).await.into_iter().collect();

            ProbeResult::Success(SourcePayload::Health(results))
        })
    }
}
