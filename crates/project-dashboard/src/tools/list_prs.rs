use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, DashboardTool};
use crate::engine::{ItemState, StatusEngine};
use crate::error::Result;

pub struct ListPrsTool;

#[derive(Debug, Deserialize)]
struct Args {
    project_id: String,
    #[serde(default)]
    state: Option<ItemState>,
    #[serde(default)]
    limit: Option<usize>,
}

impl DashboardTool for ListPrsTool {
    fn name(&self) -> &'static str {
        "list_prs"
    }

    fn description(&self) -> &'static str {
        "List pull requests for a project, most recently updated first"
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
                    "description": "PR state filter (default: open)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum PRs to return (default: 20)"
                }
            },
            "required": ["project_id"]
        })
    }

    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: Args = parse_args(args)?;
            let prs = engine
                .list_prs(&args.project_id, args.state.unwrap_or_default(), args.limit)
                .await?;
            Ok(serde_json::to_value(prs)?)
        })
    }
}
