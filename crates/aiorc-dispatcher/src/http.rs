//! The Axum HTTP boundary (SPEC_FULL.md §C.1-§C.2), modeled on the
//! teacher's `abp-daemon` router: a shared [`AppState`], one handler per
//! route, and an [`ApiError`] that implements `IntoResponse`.

use crate::dispatch::Dispatcher;
use axum::extract::{Path as AxPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

/// Shared application state, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Wrap a constructed [`Dispatcher`] for use as Axum router state.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// A non-2xx HTTP failure, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Construct an API error with an explicit status and message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the Axum router exposing `/health`, `/v1/models`, and
/// `/v1/tools/{tool_name}` (spec §6 "Dispatcher surface" and "Model
/// catalog interface").
#[must_use]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(cmd_health))
        .route("/v1/models", get(cmd_list_models))
        .route("/v1/tools", get(cmd_list_tools))
        .route("/v1/tools/{tool_name}", post(cmd_dispatch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn cmd_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}

async fn cmd_list_models(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dispatcher.list_models())
}

async fn cmd_list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dispatcher.tool_names())
}

#[derive(Debug, Deserialize)]
struct DispatchRequest {
    #[serde(default)]
    arguments: serde_json::Value,
}

async fn cmd_dispatch(
    State(state): State<AppState>,
    AxPath(tool_name): AxPath<String>,
    Json(body): Json<DispatchRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let response = state.dispatcher.dispatch(&tool_name, body.arguments, correlation_id).await;
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;
    use crate::timeouts::TimeoutTable;
    use aiorc_core::Category;
    use aiorc_policy::RestrictionPolicy;
    use aiorc_provider_mock::MockProvider;
    use aiorc_registry::ProviderRegistry;
    use aiorc_store::ConversationStore;
    use aiorc_tools::{InMemoryFileReader, SimpleTool};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct EchoTool;
    impl SimpleTool for EchoTool {
        fn name(&self) -> &str {
            "chat"
        }
        fn category(&self) -> Category {
            Category::General
        }
        fn system_prompt(&self) -> &str {
            "You are a helpful assistant."
        }
    }

    fn app() -> Router {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MockProvider::new()));
        let mut catalog = ToolCatalog::new();
        catalog.register_simple(Arc::new(EchoTool));
        let dispatcher = Dispatcher::new(
            catalog,
            Arc::new(registry),
            ConversationStore::new(),
            RestrictionPolicy::unrestricted(),
            Arc::new(InMemoryFileReader::new()),
            TimeoutTable::default(),
        );
        build_app(AppState::new(Arc::new(dispatcher)))
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let response = app()
            .oneshot(axum::http::Request::builder().uri("/health").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn models_endpoint_lists_registered_descriptors() {
        let response = app()
            .oneshot(axum::http::Request::builder().uri("/v1/models").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let names: Vec<&str> = body.as_array().unwrap().iter().map(|m| m["canonical_name"].as_str().unwrap()).collect();
        assert!(names.contains(&"mock-pro"));
    }

    #[tokio::test]
    async fn dispatch_endpoint_runs_a_simple_tool() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/tools/chat")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&json!({
                    "arguments": {
                        "prompt": "2+2=?",
                        "model": "auto",
                        "working_directory_absolute_path": "/tmp",
                    }
                }))
                .unwrap(),
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert!(body["content"].as_str().unwrap().contains('4'));
    }

    #[tokio::test]
    async fn dispatch_endpoint_reports_unknown_tool() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/tools/nonexistent")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json!({ "arguments": {} })).unwrap()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["kind"], "unknown_tool");
    }
}
