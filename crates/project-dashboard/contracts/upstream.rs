//! Upstream API payloads
//!
//! Typed views of the GitHub REST (2022-11-28) and Heroku Platform (v3) responses
//! the probes read. Every field the dashboard does not strictly need is optional so a
//! missing or malformed field decodes as `None` instead of failing the whole probe.

use serde::{Deserialize, Serialize};

/// GitHub user reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhUser {
    #[serde(default)]
    pub login: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhCommit {
    pub sha: String,
    #[serde(default)]
    pub commit: GhCommitDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhCommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<GhGitAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhGitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Label as returned on issues and pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GhLabel {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

/// Requested reviewer: a user carries a login, anything else is a team
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GhReviewer {
    User { login: String },
    Team(serde_json::Value),
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GhPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user: Option<GhUser>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub labels: Vec<GhLabel>,
    #[serde(default)]
    pub requested_reviewers: Option<Vec<GhReviewer>>,
}

/// Entry of `GET /repos/{owner}/{repo}/issues`
///
/// The issues endpoint also returns pull requests; those carry a `pull_request` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhIssue {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user: Option<GhUser>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub labels: Vec<GhLabel>,
    #[serde(default)]
    pub assignees: Option<Vec<GhUser>>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GhIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// `GET /repos/{owner}/{repo}/actions/runs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GhWorkflowRunsPage {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub workflow_runs: Vec<GhWorkflowRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GhWorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(default)]
    pub head_sha: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub run_started_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub head_commit: Option<GhHeadCommit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GhHeadCommit {
    #[serde(default)]
    pub message: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/deployments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GhDeployment {
    pub id: u64,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Entry of `GET /repos/{owner}/{repo}/deployments/{id}/statuses`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GhDeploymentStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub environment_url: Option<String>,
}

/// Entry of `GET /apps/{app}/releases`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HerokuRelease {
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<HerokuUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HerokuUser {
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_pull_request_marker() {
        let issue: GhIssue = serde_json::from_value(json!({
            "number": 7,
            "title": "Add caching",
            "pull_request": {"url": "https://api.github.com/repos/a/b/pulls/7"}
        }))
        .unwrap();
        assert!(issue.is_pull_request());

        let issue: GhIssue = serde_json::from_value(json!({"number": 8})).unwrap();
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn test_reviewer_variants() {
        let reviewers: Vec<GhReviewer> = serde_json::from_value(json!([
            {"login": "octocat", "id": 1},
            {"slug": "core-team", "name": "Core"}
        ]))
        .unwrap();

        assert_eq!(
            reviewers[0],
            GhReviewer::User {
                login: "octocat".to_string()
            }
        );
        assert!(matches!(reviewers[1], GhReviewer::Team(_)));
    }

    #[test]
    fn test_label_variants() {
        let labels: Vec<GhLabel> =
            serde_json::from_value(json!(["bug", {"name": "ui", "color": "fff"}, {"color": "000"}]))
                .unwrap();

        assert_eq!(labels[0], GhLabel::Name("bug".to_string()));
        assert_eq!(
            labels[1],
            GhLabel::Object {
                name: Some("ui".to_string())
            }
        );
        assert_eq!(labels[2], GhLabel::Object { name: None });
    }

    #[test]
    fn test_workflow_run_tolerates_missing_fields() {
        let page: GhWorkflowRunsPage = serde_json::from_value(json!({
            "total_count": 1,
            "workflow_runs": [{"id": 42, "head_sha": "abcdef0123"}]
        }))
        .unwrap();

        assert_eq!(page.workflow_runs[0].id, 42);
        assert!(page.workflow_runs[0].head_commit.is_none());
    }
}
