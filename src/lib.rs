//! Minimal MCP test server exposing toy tools over Server-Sent Events.
//!
//! Clients open `GET /sse`, receive an `endpoint` event naming
//! `/message/{session_id}`, and POST JSON-RPC requests there. Responses
//! arrive as `message` events on the open stream. Three tools are
//! exposed: `add_numbers`, `multiply_numbers` and `get_greeting`.
//!
//! # Example
//!
//! ```no_run
//! use mcp_sse_harness::{
//!     config::ServerConfig,
//!     protocol::McpServerBuilder,
//!     server::{McpHandler, ServerStateBuilder},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::builder().from_env()?.build()?;
//!
//!     let state = Arc::new(
//!         ServerStateBuilder::new()
//!             .config(config.clone())
//!             .build()
//!             .map_err(|e| anyhow::anyhow!(e))?,
//!     );
//!
//!     let server = McpServerBuilder::new()
//!         .handler(McpHandler::new(state))
//!         .config(config)
//!         .build()?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{McpError, Result};
pub use protocol::{McpServer, McpServerBuilder};
pub use server::{McpHandler, ServerState, ServerStateBuilder};
pub use session::{SessionId, SessionRegistry};
pub use tools::{BuiltinTool, ToolRegistry};
