//! MCP-compatible HTTP server.
//!
//! Exposes the ClauseFind tools via a JSON HTTP API and an MCP
//! streamable-HTTP endpoint, suitable for Cursor, Claude, and other
//! MCP-compatible clients.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call any registered tool by name |
//! | `GET`  | `/widget` | The preview widget HTML |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `*`    | `/mcp` | MCP streamable-HTTP (JSON-RPC) endpoint |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must be a non-empty string" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `tool_error` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support
//! browser-based clients and cross-origin MCP tool calls.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use clausefind_core::store::DocStore;

use crate::config::Config;
use crate::mcp::McpBridge;
use crate::tools::{ToolContext, ToolRegistry};
use crate::widget::WIDGET_HTML;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn DocStore>,
    tools: Arc<ToolRegistry>,
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until the process is terminated. The document store lives exactly
/// as long as the server — there is no persistence across restarts.
pub async fn run_server(config: Arc<Config>, store: Arc<dyn DocStore>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let tools = Arc::new(ToolRegistry::with_builtins());

    println!("Registered {} tools:", tools.len());
    for t in tools.tools() {
        println!("  POST /tools/{} — {}", t.name(), t.description());
    }

    let bridge = McpBridge::new(store.clone(), config.clone(), tools.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let state = AppState {
        config,
        store,
        tools,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/widget", get(handle_widget))
        .route("/health", get(handle_health))
        .nest_service("/mcp", mcp_service)
        .layer(cors)
        .with_state(state);

    println!("ClauseFind server listening on http://{}", bind_addr);
    println!("MCP endpoint at http://{}/mcp", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable
/// message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error for tool execution failures.
fn tool_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "tool_error".to_string(),
        message: message.into(),
    }
}

/// Maps tool execution errors to the most appropriate HTTP status.
///
/// Built-in tools signal client errors through their messages (unknown
/// document → 404, validation → 400) without needing a custom error type
/// in the `Tool` trait.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("not found") {
        not_found(format!("{}: {}", tool_name, msg))
    } else if msg.contains("must be")
        || msg.contains("must not")
        || msg.contains("is not valid")
        || msg.contains("only application/pdf")
    {
        bad_request(format!("{}: {}", tool_name, msg))
    } else {
        tool_error(format!("{}: {}", tool_name, msg))
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /tools/list ============

/// One tool descriptor in the `GET /tools/list` response.
#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// JSON response body for `GET /tools/list`.
#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

/// Handler for `GET /tools/list`.
async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters_schema(),
        })
        .collect();
    Json(ToolListResponse { tools })
}

// ============ GET /widget ============

/// Handler for `GET /widget`: the static preview widget document.
async fn handle_widget() -> Html<&'static str> {
    Html(WIDGET_HTML)
}

// ============ POST /tools/{name} ============

/// Handler for `POST /tools/{name}` — unified tool dispatch.
///
/// Returns `404` if the tool is not found, `400` for parameter validation
/// errors, and `500` for execution errors.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let ctx = ToolContext::new(state.store.clone(), state.config.clone());
    let result = tool
        .execute(params, &ctx)
        .await
        .map_err(|e| classify_tool_error(&name, e))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
