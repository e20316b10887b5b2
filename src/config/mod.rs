//! Configuration types and builders.

use crate::error::{ConfigError, Result};
use std::borrow::Cow;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default SSE keep-alive interval.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Name reported in `serverInfo` during `initialize`.
    pub name: Cow<'static, str>,
    /// Human-readable name reported by `GET /`.
    pub display_name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub host: IpAddr,
    pub port: u16,
    /// Permissive CORS. Off unless the operator opts in.
    pub cors_enabled: bool,
    pub keep_alive: Duration,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "test-mcp-server".into(),
            display_name: "Test MCP Server".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cors_enabled: false,
            keep_alive: DEFAULT_KEEP_ALIVE,
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Builder for ServerConfig with fluent API.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn host(mut self, host: IpAddr) -> Self {
        self.config.host = host;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn cors_enabled(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.config.keep_alive = interval;
        self
    }

    pub fn log_json(mut self, json: bool) -> Self {
        self.config.log_json = json;
        self
    }

    /// Build from environment variables.
    pub fn from_env(self) -> Result<Self> {
        self.from_lookup(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this so the parsing rules can be
    /// exercised without mutating the process environment.
    pub fn from_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".into(),
                message: format!("Invalid port number: '{}'", port).into(),
            })?;
        }

        if let Some(host) = lookup("HOST") {
            self.config.host = host.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "HOST".into(),
                message: format!("Invalid IP address: '{}'", host).into(),
            })?;
        }

        if let Some(cors) = lookup("MCP_CORS_ENABLED") {
            self.config.cors_enabled = parse_flag("MCP_CORS_ENABLED", &cors)?;
        }

        if let Some(secs) = lookup("MCP_KEEP_ALIVE_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "MCP_KEEP_ALIVE_SECS".into(),
                message: format!("Invalid number of seconds: '{}'", secs).into(),
            })?;
            self.config.keep_alive = Duration::from_secs(secs);
        }

        if let Some(json) = lookup("MCP_LOG_JSON") {
            self.config.log_json = parse_flag("MCP_LOG_JSON", &json)?;
        }

        Ok(self)
    }

    pub fn build(self) -> Result<ServerConfig> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<()> {
        if self.config.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".into(),
                message: "Port must be greater than 0".into(),
            }
            .into());
        }
        if self.config.keep_alive.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "keep_alive".into(),
                message: "Keep-alive interval must be greater than 0".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_flag(field: &'static str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("Expected a boolean, got '{}'", other).into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert!(!config.cors_enabled);
        assert_eq!(config.keep_alive, Duration::from_secs(30));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ServerConfigBuilder::new()
            .from_lookup(lookup(&[
                ("PORT", "9100"),
                ("HOST", "127.0.0.1"),
                ("MCP_CORS_ENABLED", "true"),
                ("MCP_KEEP_ALIVE_SECS", "5"),
            ]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9100");
        assert!(config.cors_enabled);
        assert_eq!(config.keep_alive, Duration::from_secs(5));
        assert!(!config.log_json);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfigBuilder::new().from_lookup(lookup(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_flag() {
        let result =
            ServerConfigBuilder::new().from_lookup(lookup(&[("MCP_CORS_ENABLED", "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_keep_alive_rejected() {
        let result = ServerConfigBuilder::new()
            .keep_alive(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }
}
