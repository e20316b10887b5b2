//! Error types for the MCP test server.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` conversions.

use std::borrow::Cow;
use thiserror::Error;

/// Main error type for the MCP test server.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: Cow<'static, str> },
}

/// JSON-RPC 2.0 and MCP protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(Cow<'static, str>),

    #[error("Internal error: {0}")]
    InternalError(Cow<'static, str>),
}

impl ProtocolError {
    /// Returns the JSON-RPC 2.0 error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) | Self::ToolNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::InternalError(_) => -32603,
        }
    }
}

impl From<ToolError> for ProtocolError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(name) => Self::ToolNotFound(name),
            other => Self::InvalidParams(other.to_string().into()),
        }
    }
}

/// Session registry errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session stream closed: {0}")]
    Closed(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },
}

/// Tool lookup and argument errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(Cow<'static, str>),

    #[error("Argument '{name}' must be a {expected}")]
    InvalidType {
        name: Cow<'static, str>,
        expected: &'static str,
    },

    #[error("Unsupported value for '{name}': {value}")]
    UnsupportedValue {
        name: Cow<'static, str>,
        value: String,
    },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type alias for McpError.
pub type Result<T> = std::result::Result<T, McpError>;

/// Result type alias for ProtocolError.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Result type alias for ToolError.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for SessionError.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        assert_eq!(ProtocolError::InvalidRequest("test".into()).code(), -32600);
        assert_eq!(ProtocolError::MethodNotFound("test".into()).code(), -32601);
        assert_eq!(ProtocolError::ToolNotFound("test".into()).code(), -32601);
        assert_eq!(ProtocolError::InvalidParams("test".into()).code(), -32602);
        assert_eq!(ProtocolError::InternalError("test".into()).code(), -32603);
    }

    #[test]
    fn test_tool_error_maps_to_protocol_error() {
        let not_found: ProtocolError = ToolError::NotFound("divide".into()).into();
        assert!(matches!(not_found, ProtocolError::ToolNotFound(ref name) if name == "divide"));
        assert_eq!(not_found.to_string(), "Unknown tool: divide");

        let missing: ProtocolError = ToolError::MissingArgument("name".into()).into();
        assert_eq!(missing.code(), -32602);
        assert!(missing.to_string().contains("name"));
    }

    #[test]
    fn test_error_conversion() {
        let config_error = ConfigError::InvalidValue {
            field: "PORT".into(),
            message: "must be greater than zero".into(),
        };
        let mcp_error: McpError = config_error.into();
        assert!(matches!(mcp_error, McpError::Config(_)));
        assert!(mcp_error.to_string().contains("PORT"));
    }
}
