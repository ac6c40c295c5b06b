use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, DashboardTool};
use crate::engine::StatusEngine;
use crate::error::Result;

pub struct GetProjectStatusTool;

#[derive(Debug, Deserialize)]
struct Args {
    project_id: String,
}

impl DashboardTool for GetProjectStatusTool {
    fn name(&self) -> &'static str {
        "get_project_status"
    }

    fn description(&self) -> &'static str {
        "Get comprehensive status for a project (commits, PRs, issues, workflow runs, URL health)"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Project ID"
                }
            },
            "required": ["project_id"]
        })
    }

    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: Args = parse_args(args)?;
            let snapshot = engine.get_project_status(&args.project_id).await?;
            Ok(serde_json::to_value(snapshot.into_status_document())?)
        })
    }
}
