//! Configuration types for Carros

use crate::error::{CarrosError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default file name written by `carros init`
pub const DEFAULT_CONFIG_FILE: &str = "carros.json";

/// Default TCP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:50051";

/// Where the RPC endpoint listens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// Newline-delimited JSON-RPC on a TCP listener
    Tcp { bind: String },
}

/// Service configuration file format (carros.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// RPC transport
    #[serde(default)]
    pub transport: TransportConfig,

    /// Default tracing filter, used when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Serve over TCP on `bind`, whatever the file said
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.transport = TransportConfig::Tcp { bind: bind.into() };
        self
    }

    /// Resolved TCP address, if the transport is TCP
    pub fn tcp_addr(&self) -> Result<Option<SocketAddr>> {
        match &self.transport {
            TransportConfig::Stdio => Ok(None),
            TransportConfig::Tcp { bind } => bind.parse::<SocketAddr>().map(Some).map_err(|e| {
                CarrosError::Config(format!("invalid bind address '{}': {}", bind, e))
            }),
        }
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<()> {
        self.tcp_addr()?;
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(CarrosError::Config("logFilter must not be blank".to_string()));
            }
        }
        Ok(())
    }
}
