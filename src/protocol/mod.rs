//! MCP protocol implementation over JSON-RPC 2.0 and Server-Sent Events.

pub mod handler;
pub mod routes;
pub mod server;
pub mod transport;
pub mod types;

pub use handler::{Dispatcher, Handler};
pub use routes::AppState;
pub use server::{McpServer, McpServerBuilder};
pub use types::*;
