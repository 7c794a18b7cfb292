//! Static file server for local front-end development.
//!
//! Serves a directory over HTTP/1.1 and adds permissive CORS headers to every
//! response, answering preflight `OPTIONS` requests with a bare 200.
//!
//! ```no_run
//! use cors_static_server::{Config, Server};
//!
//! # async fn start() -> Result<(), cors_static_server::ServerError> {
//! let server = Server::bind(&Config::default())?;
//! server.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::ServerError;
pub use server::Server;
