//! Callable dashboard tools
//!
//! Each tool validates its JSON arguments, calls the engine and returns a JSON document.
//! The same set backs the MCP server, the HTTP API and the CLI.

pub mod get_deployments;
pub mod get_project_status;
pub mod list_issues;
pub mod list_prs;
pub mod list_projects;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::StatusEngine;
use crate::error::{DashboardError, Result};

pub trait DashboardTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    fn call<'a>(&'a self, engine: &'a StatusEngine, args: Value) -> BoxFuture<'a, Result<Value>>;
}

pub fn all_tools() -> Vec<Box<dyn DashboardTool>> {
    vec![
        Box::new(list_projects::ListProjectsTool),
        Box::new(get_project_status::GetProjectStatusTool),
        Box::new(list_prs::ListPrsTool),
        Box::new(list_issues::ListIssuesTool),
        Box::new(get_deployments::GetDeploymentsTool),
    ]
}

/// Tool descriptors as advertised by `tools/list`
pub fn describe(tools: &[Box<dyn DashboardTool>]) -> Vec<Value> {
    tools
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name(),
                "description": t.description(),
                "inputSchema": t.schema()
            })
        })
        .collect()
}

/// Dispatch a call by tool name, recording the outcome
pub async fn call_tool(
    tools: &[Box<dyn DashboardTool>],
    engine: &StatusEngine,
    name: &str,
    args: Value,
) -> Result<Value> {
    let tool = tools
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| DashboardError::UnknownTool(name.to_string()))?;

    let result = tool.call(engine, args).await;
    engine.metrics().record_tool_call(tool.name(), result.is_ok());

    match &result {
        Ok(_) => tracing::debug!(tool = name, "Tool call succeeded"),
        Err(e) if e.is_user_error() => tracing::info!(tool = name, error = %e, "Tool call rejected"),
        Err(e) => tracing::warn!(tool = name, error = %e, "Tool call failed"),
    }
    result
}

/// Decode tool arguments; a missing/null argument object counts as `{}`
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| DashboardError::invalid_arguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::contracts::Project;
    use serde_json::json;

    fn engine() -> StatusEngine {
        StatusEngine::from_config(DashboardConfig::new(vec![
            Project::new("api", "API").with_github("acme", "api"),
            Project::new("docs", "Docs").with_tag("static"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_all_tools_unique_names() {
        let tools = all_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&"get_deployments"));
    }

    #[test]
    fn test_schemas_are_objects() {
        for descriptor in describe(&all_tools()) {
            assert_eq!(descriptor["inputSchema"]["type"], "object");
            assert!(descriptor["description"].as_str().is_some());
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = call_tool(&all_tools(), &engine(), "delete_repo", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_missing_project_id_is_invalid() {
        let err = call_tool(&all_tools(), &engine(), "list_prs", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_null_arguments_for_list_projects() {
        let value = call_tool(&all_tools(), &engine(), "list_projects", Value::Null)
            .await
            .unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_calls_are_counted() {
        let engine = engine();
        let tools = all_tools();
        call_tool(&tools, &engine, "list_projects", json!({"tag": "static"}))
            .await
            .unwrap();
        let _ = call_tool(&tools, &engine, "get_project_status", json!({"project_id": "nope"}))
            .await;

        let text = engine.metrics().encode_text().unwrap();
        assert!(text.contains("tool=\"list_projects\""));
        assert!(text.contains("result=\"error\""));
    }
}
