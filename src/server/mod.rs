//! Server module
//!
//! Binds the listener once and runs the accept loop until shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;

pub use listener::create_listener;
pub use signal::shutdown_signal;

/// A bound server: listening socket plus the state shared by connections
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Resolve the document root and bind the configured address.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let addr = config.get_socket_addr()?;
        let state = AppState::new(config)?;
        Self::bind_with_state(addr, Arc::new(state))
    }

    /// Bind `addr` for an already-built state
    pub fn bind_with_state(addr: SocketAddr, state: Arc<AppState>) -> Result<Self, ServerError> {
        let listener = create_listener(addr)?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until Ctrl+C (or SIGTERM on Unix)
    pub async fn run(self) {
        self.run_until(shutdown_signal()).await;
    }

    /// Serve until `shutdown` resolves.
    ///
    /// Accept errors are logged and do not stop the loop. Connections still
    /// in flight at shutdown are left to the runtime.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        if let Ok(addr) = self.listener.local_addr() {
            logger::log_server_start(&addr, &self.state.root);
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            connection::serve_connection(stream, peer_addr, Arc::clone(&self.state));
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = &mut shutdown => {
                    logger::log_shutdown();
                    break;
                }
            }
        }
    }
}
