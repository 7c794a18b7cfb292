// Application state module
// Read-only state shared by every connection

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServerError;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical document root, fixed for the lifetime of the server
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the document root and build the state.
    ///
    /// The root is `server.root` when configured, otherwise the current
    /// working directory at the time of the call.
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        let root = match config.server.root.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().map_err(|source| ServerError::Root {
                path: PathBuf::from("."),
                source,
            })?,
        };
        Self::with_root(config, &root)
    }

    /// Build the state for an explicit document root
    pub fn with_root(config: &Config, root: &Path) -> Result<Self, ServerError> {
        let root = root.canonicalize().map_err(|source| ServerError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServerError::Root {
                path: root,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        Ok(Self {
            config: config.clone(),
            root,
        })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
