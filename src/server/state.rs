//! Server state management.

use crate::config::ServerConfig;
use crate::tools::ToolRegistry;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ServerState {
    pub config: ServerConfig,
    pub tools: ToolRegistry,
    initialize_count: AtomicU64,
    tool_call_count: AtomicU64,
}

impl ServerState {
    pub fn new(config: ServerConfig, tools: ToolRegistry) -> Self {
        Self {
            config,
            tools,
            initialize_count: AtomicU64::new(0),
            tool_call_count: AtomicU64::new(0),
        }
    }

    /// Count a handshake; returns its sequence number.
    pub fn next_initialize(&self) -> u64 {
        self.initialize_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Count a tool call; returns its sequence number.
    pub fn next_tool_call(&self) -> u64 {
        self.tool_call_count.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    tools: Option<ToolRegistry>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            tools: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn build(self) -> Result<ServerState, &'static str> {
        let config = self.config.ok_or("Config is required")?;
        let tools = self.tools.unwrap_or_else(crate::tools::create_registry);
        Ok(ServerState::new(config, tools))
    }
}

impl Default for ServerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_config() {
        assert!(ServerStateBuilder::new().build().is_err());
    }

    #[test]
    fn test_counters_are_independent() {
        let state = ServerStateBuilder::new()
            .config(ServerConfig::default())
            .build()
            .unwrap();

        assert_eq!(state.tools.len(), 3);
        assert_eq!(state.next_initialize(), 1);
        assert_eq!(state.next_tool_call(), 1);
        assert_eq!(state.next_tool_call(), 2);
        assert_eq!(state.next_initialize(), 2);
    }
}
