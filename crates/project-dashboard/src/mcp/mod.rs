//! MCP server over stdio
//!
//! Newline-delimited JSON-RPC 2.0. Requests are answered in arrival order; notifications
//! (no `id`) are never answered. Tool errors travel as `isError: true` results so the
//! calling agent sees the message; only protocol faults use JSON-RPC errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::engine::StatusEngine;
use crate::tools::{self, DashboardTool};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "project-dashboard";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn result(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

impl ToolCallResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                r#type: "text",
                text,
            }],
            is_error,
        }
    }
}

/// Serve MCP requests from `reader` until EOF, writing responses to `writer`
pub async fn serve<R, W>(engine: &StatusEngine, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let tools = tools::all_tools();
    let mut lines = reader.lines();

    tracing::info!(tools = tools.len(), "MCP server ready on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = handle_line(engine, &tools, &line).await {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("MCP input closed, shutting down");
    Ok(())
}

/// Run the server on the process's stdin/stdout
pub async fn serve_stdio(engine: &StatusEngine) -> std::io::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(engine, stdin, tokio::io::stdout()).await
}

/// Handle one input line; `None` means nothing should be written back
pub async fn handle_line(
    engine: &StatusEngine,
    tools: &[Box<dyn DashboardTool>],
    line: &str,
) -> Option<JsonRpcResponse> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("parse error: {e}"),
            ))
        }
    };

    if !raw
        .as_object()
        .map(|o| o.contains_key("id"))
        .unwrap_or(false)
    {
        tracing::debug!(line = %line, "Ignoring notification");
        return None;
    }

    let id = raw.get("id").cloned();
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("invalid request: {e}"),
            ))
        }
    };

    Some(handle_request(engine, tools, &request).await)
}

pub async fn handle_request(
    engine: &StatusEngine,
    tools: &[Box<dyn DashboardTool>],
    req: &JsonRpcRequest,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::result(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "ping" => JsonRpcResponse::result(id, serde_json::json!({})),

        "tools/list" => JsonRpcResponse::result(
            id,
            serde_json::json!({ "tools": tools::describe(tools) }),
        ),

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "missing params");
            };
            let Some(tool_name) = params["name"].as_str() else {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name in params");
            };
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            let outcome = match tools::call_tool(tools, engine, tool_name, args).await {
                Ok(value) => serde_json::to_string_pretty(&value)
                    .map(|text| ToolCallResult::text(text, false))
                    .unwrap_or_else(|e| ToolCallResult::text(e.to_string(), true)),
                Err(e) => ToolCallResult::text(e.to_string(), true),
            };

            match serde_json::to_value(outcome) {
                Ok(result) => JsonRpcResponse::result(id, result),
                Err(e) => JsonRpcResponse::error(id, INVALID_REQUEST, e.to_string()),
            }
        }

        other => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    }
}
