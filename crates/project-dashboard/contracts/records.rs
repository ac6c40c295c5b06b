//! Normalized output records
//!
//! The stable, camelCase schema returned to tool callers. Absent upstream fields are
//! carried as `None` and serialize as `null`.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Commit summary in a repository overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub sha: String,
    pub message: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Latest workflow run in a repository overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunSummary {
    pub name: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub url: Option<String>,
}

/// Repository overview reported by `get_project_status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoOverview {
    pub recent_commits: Vec<CommitSummary>,
    #[serde(rename = "openPRs")]
    pub open_prs: usize,
    pub open_issues: usize,
    pub last_workflow_run: Option<WorkflowRunSummary>,
}

/// Commit reference attached to a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRef {
    pub sha: String,
    pub message: Option<String>,
}

/// One CI/CD workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunRecord {
    pub id: u64,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub started_at: Option<String>,
    pub url: Option<String>,
    pub commit: CommitRef,
}

/// `{workflowRuns: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRuns {
    pub workflow_runs: Vec<WorkflowRunRecord>,
}

/// One GitHub deployment with its latest status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: u64,
    pub environment: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub created_at: Option<String>,
    pub status: String,
    pub url: Option<String>,
}

/// One Heroku release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRecord {
    pub version: Option<u64>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<String>,
}

/// `{appName, releases: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HerokuReleases {
    pub app_name: String,
    pub releases: Vec<ReleaseRecord>,
}

/// HTTP status observed by a URL health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStatus {
    Code(u16),
    Unreachable,
}

impl Serialize for UrlStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UrlStatus::Code(code) => serializer.serialize_u16(*code),
            UrlStatus::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}

/// Result of probing one labelled URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlHealth {
    pub url: String,
    pub status: UrlStatus,
    pub ok: bool,
}

impl UrlHealth {
    pub fn reachable(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: UrlStatus::Code(status),
            ok: (200..300).contains(&status),
        }
    }

    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: UrlStatus::Unreachable,
            ok: false,
        }
    }
}

/// One pull request returned by `list_prs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub state: Option<String>,
    pub draft: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub url: Option<String>,
    pub labels: Vec<String>,
    pub reviewers: Option<Vec<String>>,
}

/// One issue returned by `list_issues`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub number: u64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub url: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Option<Vec<String>>,
    pub comments: Option<u64>,
}

/// Which integrations a project has configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrations {
    pub github: bool,
    pub heroku: bool,
}

/// One project returned by `list_projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub integrations: Integrations,
    pub urls: Option<BTreeMap<String, String>>,
    pub tags: BTreeSet<String>,
}
