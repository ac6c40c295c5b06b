//! Project Dashboard Contracts
//!
//! Defines the project model, probe outcomes and the aggregated status documents.

mod records;
mod upstream;

pub use records::*;
pub use upstream::*;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// A configured project and its integrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// GitHub repository integration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubRepo>,

    /// Heroku app integration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroku: Option<HerokuApp>,

    /// Health-check URLs keyed by label (e.g. `production`, `staging`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<BTreeMap<String, String>>,

    /// Tags used for filtering
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Project {
    /// Create a project with no integrations
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            github: None,
            heroku: None,
            urls: None,
            tags: BTreeSet::new(),
        }
    }

    /// Attach a GitHub repository
    pub fn with_github(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.github = Some(GithubRepo {
            owner: owner.into(),
            repo: repo.into(),
        });
        self
    }

    /// Attach a Heroku app
    pub fn with_heroku(mut self, app_name: impl Into<String>) -> Self {
        self.heroku = Some(HerokuApp {
            app_name: app_name.into(),
        });
        self
    }

    /// Add a labelled health-check URL
    pub fn with_url(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls
            .get_or_insert_with(BTreeMap::new)
            .insert(label.into(), url.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Labelled URLs worth probing (empty URLs are ignored)
    pub fn health_targets(&self) -> Vec<(&str, &str)> {
        self.urls
            .iter()
            .flatten()
            .filter(|(_, url)| !url.trim().is_empty())
            .map(|(label, url)| (label.as_str(), url.as_str()))
            .collect()
    }

    /// Identity used in every response document
    pub fn reference(&self) -> ProjectRef {
        ProjectRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// GitHub repository coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for GithubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Heroku app reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HerokuApp {
    pub app_name: String,
}

/// Project identity embedded in status documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// External source a probe reports for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    /// GitHub repository overview or workflow runs
    Github,
    /// GitHub Deployments API
    GithubDeployments,
    /// Heroku releases
    Heroku,
    /// URL health checks
    Health,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Github => "github",
            Source::GithubDeployments => "githubDeployments",
            Source::Heroku => "heroku",
            Source::Health => "health",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe
///
/// Serializes as the payload itself on success and as `{"error": reason}` on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult<T> {
    /// Probe completed and produced data
    Success(T),
    /// Probe was attempted but the upstream rejected it or was unreachable
    Failure(String),
    /// Integration not configured for the project
    Skipped(String),
}

impl<T> ProbeResult<T> {
    pub fn failure(reason: impl Into<String>) -> Self {
        ProbeResult::Failure(reason.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        ProbeResult::Skipped(reason.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeResult::Failure(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ProbeResult::Skipped(_))
    }

    /// Outcome label used for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            ProbeResult::Success(_) => "success",
            ProbeResult::Failure(_) => "failure",
            ProbeResult::Skipped(_) => "skipped",
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProbeResult<U> {
        match self {
            ProbeResult::Success(value) => ProbeResult::Success(f(value)),
            ProbeResult::Failure(reason) => ProbeResult::Failure(reason),
            ProbeResult::Skipped(reason) => ProbeResult::Skipped(reason),
        }
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ProbeResult::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ProbeResult::Success(_) => None,
            ProbeResult::Failure(reason) | ProbeResult::Skipped(reason) => Some(reason),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for ProbeResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ProbeResult::Success(value),
            Err(e) => ProbeResult::Failure(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for ProbeResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProbeResult::Success(value) => value.serialize(serializer),
            ProbeResult::Failure(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", reason)?;
                map.end()
            }
            ProbeResult::Skipped(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("skipped", reason)?;
                map.end()
            }
        }
    }
}

/// Payload produced by any probe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourcePayload {
    Overview(RepoOverview),
    WorkflowRuns(WorkflowRuns),
    Deployments(Vec<DeploymentRecord>),
    Releases(HerokuReleases),
    Health(BTreeMap<String, UrlHealth>),
}

/// Merged per-source result for one project request
///
/// Built once from settled probe outcomes. Skipped probes contribute no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    project: ProjectRef,
    sources: BTreeMap<Source, ProbeResult<SourcePayload>>,
}

impl StatusSnapshot {
    /// Assemble a snapshot from every settled probe outcome
    pub fn assemble(
        project: ProjectRef,
        outcomes: impl IntoIterator<Item = (Source, ProbeResult<SourcePayload>)>,
    ) -> Self {
        let sources = outcomes
            .into_iter()
            .filter(|(_, result)| !result.is_skipped())
            .collect();
        Self { project, sources }
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    pub fn get(&self, source: Source) -> Option<&ProbeResult<SourcePayload>> {
        self.sources.get(&source)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.sources.values().filter(|r| r.is_failure()).count()
    }

    pub fn success_count(&self) -> usize {
        self.sources.values().filter(|r| r.is_success()).count()
    }

    /// Render as a `get_project_status` document
    pub fn into_status_document(self) -> ProjectStatusDocument {
        ProjectStatusDocument {
            project: self.project,
            sources: self.sources,
        }
    }

    /// Render as a `get_deployments` document
    pub fn into_deployments_document(self) -> DeploymentsDocument {
        DeploymentsDocument {
            project: self.project,
            deployments: self.sources,
        }
    }
}

/// `{project, github?, health?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStatusDocument {
    pub project: ProjectRef,
    #[serde(flatten)]
    pub sources: BTreeMap<Source, ProbeResult<SourcePayload>>,
}

/// `{project, deployments: {github?, githubDeployments?, heroku?}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentsDocument {
    pub project: ProjectRef,
    pub deployments: BTreeMap<Source, ProbeResult<SourcePayload>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_deserializes_camel_case() {
        let project: Project = serde_json::from_value(json!({
            "id": "x",
            "name": "X",
            "github": {"owner": "acme", "repo": "x"},
            "heroku": {"appName": "x-app"},
            "urls": {"production": "https://x.example.com", "staging": ""},
            "tags": ["web", "web", "client"]
        }))
        .unwrap();

        assert_eq!(project.heroku.as_ref().unwrap().app_name, "x-app");
        assert_eq!(project.github.as_ref().unwrap().to_string(), "acme/x");
        assert_eq!(project.tags.len(), 2);
        assert_eq!(project.health_targets(), vec![("production", "https://x.example.com")]);
    }

    #[test]
    fn test_probe_result_serialization() {
        let ok: ProbeResult<u32> = ProbeResult::Success(3);
        let failed: ProbeResult<u32> = ProbeResult::failure("HTTP 500");

        assert_eq!(serde_json::to_value(&ok).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "HTTP 500"})
        );
    }

    #[test]
    fn test_probe_result_from_result() {
        let result: ProbeResult<u8> = Err::<u8, _>("boom").into();
        assert_eq!(result, ProbeResult::Failure("boom".to_string()));
        assert_eq!(result.outcome(), "failure");
    }

    #[test]
    fn test_snapshot_drops_skipped_entries() {
        let project = Project::new("x", "X");
        let snapshot = StatusSnapshot::assemble(
            project.reference(),
            vec![
                (Source::Github, ProbeResult::skipped("no GitHub integration")),
                (Source::Heroku, ProbeResult::failure("No Heroku API key configured")),
            ],
        );

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get(Source::Github).is_none());
        assert_eq!(snapshot.failure_count(), 1);
    }

    #[test]
    fn test_deployments_document_shape() {
        let project = Project::new("x", "X").with_heroku("x-app");
        let snapshot = StatusSnapshot::assemble(
            project.reference(),
            vec![(Source::Heroku, ProbeResult::failure("No Heroku API key configured"))],
        );

        let value = serde_json::to_value(snapshot.into_deployments_document()).unwrap();
        assert_eq!(
            value,
            json!({
                "project": {"id": "x", "name": "X"},
                "deployments": {"heroku": {"error": "No Heroku API key configured"}}
            })
        );
    }

    #[test]
    fn test_status_document_flattens_sources() {
        let project = Project::new("x", "X");
        let mut health = BTreeMap::new();
        health.insert(
            "production".to_string(),
            UrlHealth::reachable("https://x.example.com", 200),
        );
        let snapshot = StatusSnapshot::assemble(
            project.reference(),
            vec![
                (Source::Github, ProbeResult::failure("No GitHub token configured")),
                (Source::Health, ProbeResult::Success(SourcePayload::Health(health))),
            ],
        );

        let value = serde_json::to_value(snapshot.into_status_document()).unwrap();
        assert_eq!(value["github"], json!({"error": "No GitHub token configured"}));
        assert_eq!(value["health"]["production"]["status"], json!(200));
        assert_eq!(value["health"]["production"]["ok"], json!(true));
    }
}
