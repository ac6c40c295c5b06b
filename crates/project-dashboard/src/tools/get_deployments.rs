use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, DashboardTool};
use crate::engine::{StatusEngine, DEFAULT_DEPLOYMENT_LIMIT};
use crate::error::Result;

pub struct GetDeploymentsTool;

#[derive(Debug, Deserialize)]
struct Args {
    project_id: String,
    #[serde(default)]
    limit: Option<usize>,
}

impl DashboardTool for GetDeploymentsTool {
    fn name(&self) -> &'static str {
        "get_deployments"
    }

    fn description(&self) -> &'static str {
        "Get recent deployments and their status for a project"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": {
                    "type": "string",
                    "description": "Project ID"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": format!("Maximum deployments to return (default: {})", DEFAULT_DEPLOYMENT_LIMIT)
                }
            },
            "required": ["project_id"]
        })
    }

    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let args: Args = parse_args(args)?;
            let snapshot = engine.get_deployments(&args.project_id, args.limit).await?;
            Ok(serde_json::to_value(snapshot.into_deployments_document())?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::contracts::Project;
    use crate::error::DashboardError;
    use serde_json::json;

    #[tokio::test]
    async fn test_rejects_negative_limit() {
        let engine =
            StatusEngine::from_config(DashboardConfig::new(vec![Project::new("x", "X")])).unwrap();

        let err = GetDeploymentsTool
            .call(&engine, json!({"project_id": "x", "limit": -1}))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_project_without_integrations() {
        let engine =
            StatusEngine::from_config(DashboardConfig::new(vec![Project::new("x", "X")])).unwrap();

        let value = GetDeploymentsTool
            .call(&engine, json!({"project_id": "x"}))
            .await
            .unwrap();
        assert_eq!(
            value,
            json!({"project": {"id": "x", "name": "X"}, "deployments": {}})
        );
    }
}
