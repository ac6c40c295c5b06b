use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, DashboardTool};
use crate::engine::{ItemState, StatusEngine};
use crate::error::Result;

pub struct ListIssuesTool;

#[derive(Debug, Deserialize)]
struct Args {
    project_id: String,
    #[serde(default)]
    state: Option<ItemState>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl DashboardTool for ListIssuesTool {
    fn name(&self) -> &'static str {
        "list_issues"
    }

    fn description(&self) -> &'static str {
        "List issues for a project (excludes PRs)"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Project ID"
                },
                "state": {
                    "type": "string",
                    "enum": ["open", "closed", "all"],
                    "description": "Issue state filter (default: open)"
                },
                "labels": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Filter by labels"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum issues to return (default: 20)"
                }
            },
            "required": ["project_id"]
        })
    }

    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: Args = parse_args(args)?;
            let labels = args.labels.unwrap_or_default();
            let issues = engine
                .list_issues(
                    &args.project_id,
                    args.state.unwrap_or_default(),
                    &labels,
                    args.limit,
                )
                .await?;
            Ok(serde_json::to_value(issues)?)
        })
    }
}
