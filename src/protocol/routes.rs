//! HTTP routes: session stream, message intake, health and metadata.

use crate::config::ServerConfig;
use crate::error::{ProtocolError, SessionError};
use crate::protocol::handler::{Dispatcher, Handler};
use crate::protocol::transport::{self, message_event};
use crate::protocol::types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_VERSION, RequestId,
};
use crate::session::{SessionEvent, SessionRegistry};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response, Sse},
};
use futures::stream;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared state handed to every route.
pub struct AppState<H: Handler> {
    pub dispatcher: Arc<Dispatcher<H>>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<ServerConfig>,
}

impl<H: Handler> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            sessions: Arc::clone(&self.sessions),
            config: Arc::clone(&self.config),
        }
    }
}

/// Errors reported in the HTTP response itself rather than on a stream.
#[derive(Debug)]
pub enum HttpError {
    InvalidJson(String),
    SessionNotFound(String),
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::InvalidJson(e) => (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)),
            Self::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Session not found".to_string()),
            Self::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<SessionError> for HttpError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) | SessionError::Closed(id) => Self::SessionNotFound(id),
        }
    }
}

/// GET / - static server metadata.
pub async fn root<H: Handler + 'static>(State(app): State<AppState<H>>) -> Json<Value> {
    Json(json!({
        "name": app.config.display_name,
        "version": app.config.version,
        "protocol": format!("MCP {}", MCP_VERSION),
        "transport": ["Streamable HTTP", "SSE"],
        "endpoints": {
            "mcp": "/mcp",
            "sse": "/sse",
            "message": "/message/{session_id}",
            "health": "/health",
        }
    }))
}

/// GET /health - liveness and open session count.
pub async fn health<H: Handler + 'static>(State(app): State<AppState<H>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "active_sessions": app.sessions.len(),
    }))
}

/// GET /sse - open a session stream.
pub async fn sse<H: Handler + 'static>(State(app): State<AppState<H>>) -> impl IntoResponse {
    let (session_id, receiver, guard) = app.sessions.open();
    debug!("Announcing endpoint {}", transport::message_path(&session_id));

    let events = transport::session_stream(session_id, receiver, guard);
    transport::sse_response(events, app.config.keep_alive)
}

/// POST /message/{session_id} - accept a JSON-RPC request for a session.
///
/// The JSON-RPC response goes out on the session's stream; the HTTP
/// response only acknowledges receipt.
pub async fn message<H: Handler + 'static>(
    State(app): State<AppState<H>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let message = parse_body(&body)?;

    if !app.sessions.contains(&session_id) {
        warn!(
            "Session not found: {} (active: {})",
            session_id,
            app.sessions.len()
        );
        return Err(HttpError::SessionNotFound(session_id));
    }

    debug!("Received message for session {}", session_id);
    if let Some(response) = process(&app.dispatcher, message).await {
        let json = transport::encode_response(&response)
            .map_err(|e| HttpError::Internal(e.to_string()))?;
        app.sessions
            .send(&session_id, SessionEvent::JsonRpc(json))
            .map_err(HttpError::from)?;
    }

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))).into_response())
}

/// POST /mcp - stateless Streamable HTTP.
///
/// The response is returned directly as a one-event SSE body.
pub async fn mcp<H: Handler + 'static>(
    State(app): State<AppState<H>>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let message = parse_body(&body)?;

    match process(&app.dispatcher, message).await {
        Some(response) => {
            let json = transport::encode_response(&response)
                .map_err(|e| HttpError::Internal(e.to_string()))?;
            let events = stream::once(async move { Ok::<_, Infallible>(message_event(json)) });
            Ok(Sse::new(events).into_response())
        }
        None => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

fn parse_body(body: &[u8]) -> Result<Value, HttpError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("JSON parse error: {}", e);
        HttpError::InvalidJson(e.to_string())
    })
}

/// Dispatch a decoded message, answering malformed requests with `-32600`.
async fn process<H: Handler>(
    dispatcher: &Dispatcher<H>,
    message: Value,
) -> Option<JsonRpcResponse> {
    let id = message
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<RequestId>(id).ok());

    match serde_json::from_value::<JsonRpcRequest>(message) {
        Ok(request) => {
            info!("JSON-RPC {} (id: {:?})", request.method, request.id);
            dispatcher.dispatch(request).await
        }
        Err(e) => {
            error!("Not a JSON-RPC request: {}", e);
            let err = ProtocolError::InvalidRequest(e.to_string().into());
            Some(JsonRpcResponse::error(
                id,
                JsonRpcError::new(err.code(), err.to_string()),
            ))
        }
    }
}
