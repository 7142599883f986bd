//! Axum HTTP service around the square-root calculator agent.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Agent metadata and usage. |
//! | `GET`  | `/health` | Liveness plus whether an API key is configured. |
//! | `POST` | `/run` | Run the agent on `{ "query": ... }`. |

use super::sqrt::{square_root_agent, TOOL_NAME};
use crate::agent::ComposedAgent;
use crate::error::Result;
use crate::runner::{ChatModel, Runner};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Shared state injected into every handler
pub struct AppState {
    agent: Arc<ComposedAgent>,
    runner: Runner,
    api_key_set: bool,
}

impl AppState {
    pub fn new(model: Arc<dyn ChatModel>, api_key_set: bool) -> Result<Self> {
        Ok(Self {
            agent: Arc::new(square_root_agent()?),
            runner: Runner::new(model),
            api_key_set,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub result: String,
}

/// Errors returned as `{ "detail": ... }`
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("OPENAI_API_KEY is not set in environment variables")]
    MissingApiKey,

    #[error("Error running agent: {0}")]
    Run(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::EmptyQuery => StatusCode::BAD_REQUEST,
            ServiceError::MissingApiKey | ServiceError::Run(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/run", post(run_handler))
        .with_state(state)
}

/// GET / - agent metadata
async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "message": "OpenAI Agent API with Square Root Calculator",
        "agent_name": state.agent.name,
        "model": state.agent.model,
        "tools": [TOOL_NAME],
        "usage": "Send a POST request to /run with a query about square roots",
    }))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "agent": state.agent.name,
            "openai_api_key_set": state.api_key_set,
        })),
    )
}

/// POST /run
async fn run_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> std::result::Result<Json<AgentResponse>, ServiceError> {
    let Json(request) = body.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;
    if request.query.trim().is_empty() {
        return Err(ServiceError::EmptyQuery);
    }
    if !state.api_key_set {
        return Err(ServiceError::MissingApiKey);
    }

    tracing::info!(query_len = request.query.len(), "Running calculator agent");
    let result = state
        .runner
        .run_once(state.agent.clone(), &request.query)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Calculator agent run failed");
            ServiceError::Run(e.to_string())
        })?;

    Ok(Json(AgentResponse { result }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolCall;
    use crate::runner::scripted::ScriptedModel;
    use crate::runner::ModelResponse;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(model: Arc<ScriptedModel>, api_key_set: bool) -> Router {
        router(Arc::new(AppState::new(model, api_key_set).unwrap()))
    }

    fn run_request(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root_metadata() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(ScriptedModel::new(vec![]), true), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agent_name"], "Square Root Calculator Agent");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["tools"], json!(["calculate_square_root"]));
    }

    #[tokio::test]
    async fn test_health_reports_key() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(ScriptedModel::new(vec![]), false), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "healthy",
                "agent": "Square Root Calculator Agent",
                "openai_api_key_set": false
            })
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_bad_request() {
        let (status, body) = send(app(ScriptedModel::new(vec![]), true), run_request("   ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "Query cannot be empty" }));
    }

    #[tokio::test]
    async fn test_malformed_body_has_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "question": "sqrt 4" }).to_string()))
            .unwrap();
        let (status, body) = send(app(ScriptedModel::new(vec![]), true), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Invalid request body:"));
        assert!(detail.contains("query"));
    }

    #[tokio::test]
    async fn test_non_json_body_has_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from("sqrt 4"))
            .unwrap();
        let (status, body) = send(app(ScriptedModel::new(vec![]), true), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let (status, body) =
            send(app(ScriptedModel::new(vec![]), false), run_request("sqrt of 16?")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["detail"],
            "OPENAI_API_KEY is not set in environment variables"
        );
    }

    #[tokio::test]
    async fn test_run_uses_tool() {
        let model = ScriptedModel::new(vec![
            ModelResponse::calls(vec![ToolCall::new(
                "c1",
                "calculate_square_root",
                r#"{"number": 16}"#,
            )]),
            ModelResponse::text("The square root of 16 is 4."),
        ]);
        let (status, body) = send(app(model.clone(), true), run_request("What is the square root of 16?")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": "The square root of 16 is 4." }));

        let requests = model.requests.lock();
        assert_eq!(
            requests[1].transcript[2],
            crate::message::Message::tool("c1", "The square root of 16.0 is 4.0")
        );
    }

    #[tokio::test]
    async fn test_engine_failure_is_internal_error() {
        let model = ScriptedModel::new(vec![]);
        model.push_error("upstream down");
        let (status, body) = send(app(model, true), run_request("sqrt 9")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Error running agent: "));
    }
}
