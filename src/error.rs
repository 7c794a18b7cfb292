//! Server error taxonomy
//!
//! Only startup can fail; request-level failures are turned into HTTP statuses
//! by the handlers and never reach this type.

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ServerError {
    /// Configuration file or environment could not be parsed
    Config(config::ConfigError),
    /// Host and port do not form a socket address
    Address(String),
    /// Document root is missing or not a directory
    Root { path: PathBuf, source: std::io::Error },
    /// Listening socket could not be bound (port in use, permission denied)
    Bind { addr: SocketAddr, source: std::io::Error },
    /// Log file could not be opened
    Logger(std::io::Error),
    /// Tokio runtime could not be started
    Runtime(std::io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(inner) => write!(formatter, "invalid configuration: {inner}"),
            Self::Address(detail) => write!(formatter, "invalid listen address: {detail}"),
            Self::Root { path, source } => {
                write!(formatter, "document root {} unusable: {source}", path.display())
            }
            Self::Bind { addr, source } => write!(formatter, "failed to bind {addr}: {source}"),
            Self::Logger(inner) => write!(formatter, "failed to open log file: {inner}"),
            Self::Runtime(inner) => write!(formatter, "failed to start runtime: {inner}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(inner) => Some(inner),
            Self::Root { source, .. } | Self::Bind { source, .. } => Some(source),
            Self::Logger(inner) | Self::Runtime(inner) => Some(inner),
            Self::Address(_) => None,
        }
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(inner: config::ConfigError) -> Self {
        Self::Config(inner)
    }
}
