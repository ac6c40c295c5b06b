//! Presentation mapper
//!
//! Stateless reshaping of upstream records into the stable output schema. Nothing here
//! can fail; absent upstream fields stay absent.

use crate::contracts::*;

/// Length of an abbreviated commit SHA
pub const SHORT_SHA_LEN: usize = 7;

/// First seven characters of a SHA, unchanged if shorter
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA_LEN).collect()
}

/// First line of a (possibly multi-line) commit message
pub fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

/// Label names; object labels without a name are dropped
pub fn label_names(labels: &[GhLabel]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| match label {
            GhLabel::Name(name) => Some(name.clone()),
            GhLabel::Object { name } => name.clone(),
        })
        .collect()
}

/// Reviewer login, or `"team"` for non-user reviewers
pub fn reviewer_name(reviewer: &GhReviewer) -> String {
    match reviewer {
        GhReviewer::User { login } => login.clone(),
        GhReviewer::Team(_) => "team".to_string(),
    }
}

/// Drop entries of the issues listing that are really pull requests
pub fn exclude_pull_requests(issues: Vec<GhIssue>) -> Vec<GhIssue> {
    issues.into_iter().filter(|i| !i.is_pull_request()).collect()
}

fn login(user: &Option<GhUser>) -> Option<String> {
    user.as_ref().and_then(|u| u.login.clone())
}

pub fn commit_summary(commit: &GhCommit) -> CommitSummary {
    let author = commit.commit.author.as_ref();
    CommitSummary {
        sha: short_sha(&commit.sha),
        message: commit.commit.message.as_deref().map(first_line),
        author: author.and_then(|a| a.name.clone()),
        date: author.and_then(|a| a.date.clone()),
    }
}

pub fn workflow_run_summary(run: &GhWorkflowRun) -> WorkflowRunSummary {
    WorkflowRunSummary {
        name: run.name.clone(),
        status: run.status.clone(),
        conclusion: run.conclusion.clone(),
        url: run.html_url.clone(),
    }
}

pub fn workflow_run_record(run: &GhWorkflowRun) -> WorkflowRunRecord {
    WorkflowRunRecord {
        id: run.id,
        name: run.name.clone(),
        branch: run.head_branch.clone(),
        status: run.status.clone(),
        conclusion: run.conclusion.clone(),
        started_at: run.run_started_at.clone(),
        url: run.html_url.clone(),
        commit: CommitRef {
            sha: short_sha(&run.head_sha),
            message: run
                .head_commit
                .as_ref()
                .and_then(|c| c.message.as_deref())
                .map(first_line),
        },
    }
}

/// Combine a deployment with its latest status (if any)
pub fn deployment_record(
    deployment: &GhDeployment,
    latest: Option<&GhDeploymentStatus>,
) -> DeploymentRecord {
    DeploymentRecord {
        id: deployment.id,
        environment: deployment.environment.clone(),
        git_ref: deployment.git_ref.clone(),
        created_at: deployment.created_at.clone(),
        status: latest
            .and_then(|s| s.state.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        url: latest.and_then(|s| s.environment_url.clone()),
    }
}

pub fn release_record(release: &HerokuRelease) -> ReleaseRecord {
    ReleaseRecord {
        version: release.version,
        status: release.status.clone(),
        description: release.description.clone(),
        created_at: release.created_at.clone(),
        user: release.user.as_ref().and_then(|u| u.email.clone()),
    }
}

pub fn pull_request_record(pr: &GhPullRequest) -> PullRequestRecord {
    PullRequestRecord {
        number: pr.number,
        title: pr.title.clone(),
        author: login(&pr.user),
        state: pr.state.clone(),
        draft: pr.draft,
        created_at: pr.created_at.clone(),
        updated_at: pr.updated_at.clone(),
        url: pr.html_url.clone(),
        labels: label_names(&pr.labels),
        reviewers: pr
            .requested_reviewers
            .as_ref()
            .map(|r| r.iter().map(reviewer_name).collect()),
    }
}

pub fn issue_record(issue: &GhIssue) -> IssueRecord {
    IssueRecord {
        number: issue.number,
        title: issue.title.clone(),
        author: login(&issue.user),
        state: issue.state.clone(),
        created_at: issue.created_at.clone(),
        updated_at: issue.updated_at.clone(),
        url: issue.html_url.clone(),
        labels: label_names(&issue.labels),
        assignees: issue
            .assignees
            .as_ref()
            .map(|a| a.iter().filter_map(|u| u.login.clone()).collect()),
        comments: issue.comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("abcdef0123456789"), "abcdef0");
        assert_eq!(short_sha("abc"), "abc");
        assert_eq!(short_sha(""), "");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("Fix bug\n\nLonger body"), "Fix bug");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_deployment_without_status_is_unknown() {
        let deployment = GhDeployment {
            id: 9,
            environment: Some("production".to_string()),
            git_ref: Some("main".to_string()),
            created_at: None,
        };

        let record = deployment_record(&deployment, None);
        assert_eq!(record.status, "unknown");
        assert!(record.url.is_none());

        let status = GhDeploymentStatus {
            state: Some("success".to_string()),
            environment_url: Some("https://app.example.com".to_string()),
        };
        let record = deployment_record(&deployment, Some(&status));
        assert_eq!(record.status, "success");
        assert_eq!(record.url.as_deref(), Some("https://app.example.com"));
    }

    #[test]
    fn test_pull_request_record() {
        let pr: GhPullRequest = serde_json::from_value(json!({
            "number": 12,
            "title": "Add cache",
            "user": {"login": "octocat"},
            "state": "open",
            "draft": false,
            "html_url": "https://github.com/acme/api/pull/12",
            "labels": [{"name": "perf"}, "easy"],
            "requested_reviewers": [{"login": "hubot"}, {"slug": "core"}]
        }))
        .unwrap();

        let record = pull_request_record(&pr);
        assert_eq!(record.author.as_deref(), Some("octocat"));
        assert_eq!(record.labels, vec!["perf", "easy"]);
        assert_eq!(
            record.reviewers,
            Some(vec!["hubot".to_string(), "team".to_string()])
        );
    }

    #[test]
    fn test_release_user_email() {
        let release: HerokuRelease = serde_json::from_value(json!({
            "version": 42,
            "status": "succeeded",
            "description": "Deploy abc123",
            "created_at": "2024-01-01T00:00:00Z",
            "user": {"email": "dev@example.com"}
        }))
        .unwrap();

        let record = release_record(&release);
        assert_eq!(record.version, Some(42));
        assert_eq!(record.user.as_deref(), Some("dev@example.com"));

        let bare: HerokuRelease = serde_json::from_value(json!({"version": 1})).unwrap();
        assert!(release_record(&bare).user.is_none());
    }

    #[test]
    fn test_workflow_run_record() {
        let run: GhWorkflowRun = serde_json::from_value(json!({
            "id": 7,
            "name": "CI",
            "head_branch": "main",
            "head_sha": "0123456789abcdef",
            "status": "completed",
            "conclusion": "success",
            "head_commit": {"message": "Bump deps\n\nSigned-off-by: x"}
        }))
        .unwrap();

        let record = workflow_run_record(&run);
        assert_eq!(record.commit.sha, "0123456");
        assert_eq!(record.commit.message.as_deref(), Some("Bump deps"));
        assert_eq!(record.branch.as_deref(), Some("main"));
    }

    proptest! {
        #[test]
        fn prop_short_sha_is_prefix(sha in "[0-9a-f]{0,40}") {
            let short = short_sha(&sha);
            prop_assert!(short.len() <= SHORT_SHA_LEN);
            prop_assert!(sha.starts_with(&short));
            prop_assert_eq!(short.len(), sha.len().min(SHORT_SHA_LEN));
        }

        #[test]
        fn prop_first_line_has_no_newline(message in "[a-zA-Z \\n]{0,80}") {
            let line = first_line(&message);
            prop_assert!(!line.contains('\n'));
            prop_assert!(message.starts_with(&line));
        }

        #[test]
        fn prop_pull_requests_never_survive(markers in proptest::collection::vec(any::<bool>(), 0..30)) {
            let issues: Vec<GhIssue> = markers
                .iter()
                .enumerate()
                .map(|(n, is_pr)| GhIssue {
                    number: n as u64,
                    pull_request: is_pr.then(|| json!({})),
                    ..Default::default()
                })
                .collect();

            let kept = exclude_pull_requests(issues);
            prop_assert!(kept.iter().all(|i| !i.is_pull_request()));
            prop_assert_eq!(kept.len(), markers.iter().filter(|m| !**m).count());
        }
    }
}
