//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: intercepts preflight requests,
//! dispatches GET/HEAD to static file serving, and finalizes every response
//! with the `Server` and CORS headers before it is written.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let response = route_request(&parts, &state).await;
    let response = finalize_response(response, &state.config.http.server_name);

    if state.access_log_enabled() {
        log_access(&parts, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// Dispatch on method: OPTIONS short-circuits, GET/HEAD hit the filesystem
async fn route_request(req: &Parts, state: &AppState) -> Response<ResponseBody> {
    let method = &req.method;
    match *method {
        Method::OPTIONS => http::build_options_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext {
                path: req.uri.path(),
                query: req.uri.query(),
                is_head: *method == Method::HEAD,
            };
            static_files::serve(&ctx, state).await
        }
        _ => {
            // Static content only answers GET and HEAD
            let message = format!("Unsupported method ('{method}')");
            http::build_error_response(StatusCode::NOT_IMPLEMENTED, &message, false)
        }
    }
}

/// Last step before a response is written; nothing bypasses it
fn finalize_response(
    mut response: Response<ResponseBody>,
    server_name: &str,
) -> Response<ResponseBody> {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(_) => logger::log_warning(&format!("Invalid Server header value: {server_name:?}")),
    }
    http::with_cors(response)
}

fn log_access(
    req: &Parts,
    response: &Response<ResponseBody>,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let uri = req
        .uri
        .path_and_query()
        .map_or_else(|| req.uri.to_string(), ToString::to_string);
    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method.to_string(), uri);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
