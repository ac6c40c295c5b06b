use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, DashboardTool};
use crate::engine::StatusEngine;
use crate::error::Result;

pub struct ListProjectsTool;

#[derive(Debug, Default, Deserialize)]
struct Args {
    #[serde(default)]
    tag: Option<String>,
}

impl DashboardTool for ListProjectsTool {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        "List all configured projects with their integrations"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tag": {
                    "type": "string",
                    "description": "Filter by tag"
                }
            },
            "required": []
        })
    }

    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: Args = parse_args(args)?;
            Ok(serde_json::to_value(engine.list_projects(args.tag.as_deref()))?)
        })
    }
}
