// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};

/// Base name of the optional configuration file (`cors-server.toml`, `.json`, ...)
pub const CONFIG_FILE: &str = "cors-server";

/// Prefix of environment overrides, e.g. `CORS_SERVER__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "CORS_SERVER";

impl Config {
    /// Load configuration from the default file name plus environment overrides
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults apply
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ServerError::Address(format!("{}:{} ({e})", self.server.host, self.server.port))
            })
    }

    /// URL printed in the startup banner
    pub fn browser_url(&self) -> String {
        format!("http://localhost:{}", self.server.port)
    }
}
