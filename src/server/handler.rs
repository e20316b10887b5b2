//! MCP request handler implementation.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{
    CallToolParams, CallToolResult, Handler, InitializeParams, InitializeResult, ListToolsResult,
    MCP_VERSION, ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::server::state::ServerState;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP request handler backed by the built-in tool registry.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        let handshake = self.state.next_initialize();
        match &params.client_info {
            Some(client) => info!(
                "Initialize #{} from {} v{}",
                handshake, client.name, client.version
            ),
            None => info!("Initialize #{} from anonymous client", handshake),
        }
        if let Some(version) = params.protocol_version.as_deref()
            && version != MCP_VERSION
        {
            debug!("Client requested protocol {}, answering with {}", version, MCP_VERSION);
        }

        let names: Vec<String> = self.state.tools.list().into_iter().map(|t| t.name).collect();
        let instructions = format!(
            "Test MCP server for tool discovery and invocation. Available tools: {}.",
            names.join(", ")
        );

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
            instructions: Some(instructions),
        })
    }

    async fn initialized(&self) -> ProtocolResult<()> {
        info!("Client initialization complete");
        Ok(())
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        let tools = self.state.tools.list();
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        let call = self.state.next_tool_call();
        info!("Tool call #{}: {}", call, params.name);

        self.state.tools.execute(params).map_err(|e| {
            warn!("Tool call #{} rejected: {}", call, e);
            ProtocolError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::protocol::ClientInfo;
    use crate::server::state::ServerStateBuilder;
    use serde_json::json;

    fn state() -> Arc<ServerState> {
        Arc::new(
            ServerStateBuilder::new()
                .config(ServerConfig::default())
                .build()
                .unwrap(),
        )
    }

    fn handler() -> McpHandler {
        McpHandler::new(state())
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let state = state();
        let handler = McpHandler::new(Arc::clone(&state));
        let result = handler
            .initialize(InitializeParams {
                client_info: Some(ClientInfo {
                    name: "platform".into(),
                    version: "3.0".into(),
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.protocol_version, "2024-11-05");
        assert_eq!(result.server_info.name, "test-mcp-server");
        assert!(result.capabilities.tools.is_some());
        assert!(result.instructions.unwrap().contains("get_greeting"));
        assert_eq!(state.next_initialize(), 2);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let result = handler().list_tools().await.unwrap();
        assert_eq!(result.tools.len(), 3);
        assert!(result.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_call_tool_maps_errors() {
        let state = state();
        let handler = McpHandler::new(Arc::clone(&state));

        let err = handler
            .call_tool(CallToolParams {
                name: "nope".into(),
                arguments: json!({}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::ToolNotFound(_)));

        let err = handler
            .call_tool(CallToolParams {
                name: "multiply_numbers".into(),
                arguments: json!({"x": 2, "y": "3"}),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), -32602);
        assert_eq!(state.next_tool_call(), 3);
    }
}
