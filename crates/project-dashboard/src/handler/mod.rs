//! HTTP handler for the Project Dashboard
//!
//! Exposes the dashboard tools and the per-project documents over HTTP, plus liveness
//! and Prometheus endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::engine::StatusEngine;
use crate::error::DashboardError;
use crate::tools::{self, DashboardTool};

/// Application state
pub struct AppState {
    pub engine: StatusEngine,
    pub tools: Vec<Box<dyn DashboardTool>>,
}

impl AppState {
    pub fn new(engine: StatusEngine) -> Self {
        Self {
            engine,
            tools: tools::all_tools(),
        }
    }
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/tools/:name", post(call_tool))
        .route("/api/v1/projects", get(list_projects))
        .route("/api/v1/projects/:id/status", get(project_status))
        .route("/api/v1/projects/:id/deployments", get(project_deployments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type ApiResult = Result<Json<ApiResponse<Value>>, (StatusCode, Json<ApiError>)>;

/// Liveness endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: crate::mcp::SERVER_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        projects: state.engine.registry().len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Prometheus scrape endpoint
async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.metrics().encode_text() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.to_string(),
            )
        }
    }
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(Value::Array(tools::describe(&state.tools))))
}

/// Invoke a tool by name with a JSON argument body
async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult {
    let args = body.map(|Json(v)| v).unwrap_or(Value::Null);
    respond(tools::call_tool(&state.tools, &state.engine, &name, args).await)
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult {
    let projects = state.engine.list_projects(query.tag.as_deref());
    respond(serde_json::to_value(projects).map_err(DashboardError::from))
}

async fn project_status(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    let result = state.engine.get_project_status(&id).await.and_then(|snapshot| {
        serde_json::to_value(snapshot.into_status_document()).map_err(DashboardError::from)
    });
    respond(result)
}

async fn project_deployments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DeploymentsQuery>,
) -> ApiResult {
    let result = state
        .engine
        .get_deployments(&id, query.limit)
        .await
        .and_then(|snapshot| {
            serde_json::to_value(snapshot.into_deployments_document())
                .map_err(DashboardError::from)
        });
    respond(result)
}

fn respond(result: Result<Value, DashboardError>) -> ApiResult {
    let request_id = Uuid::new_v4();
    match result {
        Ok(data) => Ok(Json(ApiResponse {
            success: true,
            data,
            request_id,
        })),
        Err(e) => Err((
            status_for(&e),
            Json(ApiError {
                error: e.code().to_string(),
                message: e.to_string(),
                request_id: Some(request_id),
            }),
        )),
    }
}

/// HTTP status for a terminal error
pub fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::ProjectNotFound(_) | DashboardError::UnknownTool(_) => StatusCode::NOT_FOUND,
        DashboardError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
        DashboardError::NotConfigured { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DashboardError::CredentialMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        DashboardError::Config(_) | DashboardError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub projects: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentsQuery {
    pub limit: Option<usize>,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: Uuid,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            request_id: Uuid::new_v4(),
        }
    }
}

/// API error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub request_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::contracts::Project;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let engine = StatusEngine::from_config(DashboardConfig::new(vec![
            Project::new("api", "API")
                .with_github("acme", "api")
                .with_tag("backend"),
            Project::new("docs", "Docs"),
        ]))
        .unwrap();
        create_router(Arc::new(AppState::new(engine)))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&DashboardError::ProjectNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DashboardError::CredentialMissing(DashboardError::NO_GITHUB_TOKEN)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&DashboardError::upstream("PRs", "HTTP 500")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(router(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["projects"], 2);
    }

    #[tokio::test]
    async fn test_list_projects_with_tag() {
        let (status, body) = send(router(), get("/api/v1/projects?tag=backend")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], "api");
    }

    #[tokio::test]
    async fn test_unknown_project_is_404() {
        let (status, body) = send(router(), get("/api/v1/projects/ghost/status")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ProjectNotFound");
        assert_eq!(body["message"], "Project not found: ghost");
    }

    #[tokio::test]
    async fn test_call_tool_not_configured() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/tools/list_prs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"project_id": "docs"}"#))
            .unwrap();

        let (status, body) = send(router(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Project docs has no GitHub integration");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/tools/nope")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "UnknownTool");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let router = router();
        let _ = send(router.clone(), get("/api/v1/projects/docs/status")).await;

        let response = router.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
