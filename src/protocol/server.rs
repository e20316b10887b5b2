//! MCP server with lifecycle management.

use crate::config::ServerConfig;
use crate::error::{McpError, Result};
use crate::protocol::handler::{Dispatcher, Handler};
use crate::protocol::routes::{self, AppState};
use crate::session::SessionRegistry;
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

/// MCP Server.
pub struct McpServer<H: Handler> {
    config: Arc<ServerConfig>,
    handler: Arc<H>,
    sessions: Arc<SessionRegistry>,
}

impl<H: Handler + 'static> McpServer<H> {
    /// Create a new MCP server.
    pub fn new(handler: H, config: ServerConfig, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
            sessions,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::new(Arc::clone(&self.handler))),
            sessions: Arc::clone(&self.sessions),
            config: Arc::clone(&self.config),
        };

        let router = Router::new()
            .route("/", get(routes::root::<H>))
            .route("/health", get(routes::health::<H>))
            .route("/sse", get(routes::sse::<H>))
            .route("/message/{session_id}", post(routes::message::<H>))
            .route("/mcp", post(routes::mcp::<H>))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.cors_enabled {
            info!("CORS enabled (permissive)");
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind the configured address and serve until Ctrl+C.
    #[instrument(skip(self), fields(server = %self.config.name))]
    pub async fn run(self) -> Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", addr);

        self.run_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves.
    pub async fn run_with_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(
            "Starting MCP server: {} v{}",
            self.config.name, self.config.version
        );

        let app = self.router();
        let sessions = Arc::clone(&self.sessions);

        // Open SSE streams never finish on their own, so end them before
        // waiting for connections to drain.
        let graceful = async move {
            shutdown.await;
            let closed = sessions.close_all();
            info!("Shutting down, closed {} session(s)", closed);
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
            .map_err(McpError::Io)?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Builder for MCP Server.
pub struct McpServerBuilder<H: Handler> {
    handler: Option<H>,
    config: ServerConfig,
    sessions: Option<Arc<SessionRegistry>>,
}

impl<H: Handler + 'static> McpServerBuilder<H> {
    pub fn new() -> Self {
        Self {
            handler: None,
            config: ServerConfig::default(),
            sessions: None,
        }
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sessions(mut self, sessions: Arc<SessionRegistry>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn build(self) -> Result<McpServer<H>> {
        let handler = self.handler.ok_or_else(|| McpError::Internal {
            message: "Handler is required".into(),
        })?;
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(SessionRegistry::new()));

        Ok(McpServer::new(handler, self.config, sessions))
    }
}

impl<H: Handler + 'static> Default for McpServerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}
