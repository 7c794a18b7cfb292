//! HTTP response building module
//!
//! Provides builders for the responses the static handler produces. None of
//! them add CORS headers; that happens once, in the router.

use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use tokio::fs::File;

use super::body::{self, FileBody, ResponseBody};

/// Content-Type of generated HTML pages (listings)
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content-Type of error pages
pub const ERROR_CONTENT_TYPE: &str = "text/html;charset=utf-8";

/// Build 200 response streaming `content_length` bytes of an open file
pub fn build_file_response(
    file: File,
    content_length: u64,
    content_type: &str,
    is_head: bool,
) -> Response<ResponseBody> {
    let body = if is_head {
        body::empty()
    } else {
        FileBody::new(file, content_length).boxed()
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(body::empty())
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(body::empty())
        })
}

/// Build 301 redirect to the slash-terminated form of a directory URL
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(body::empty())
        })
}

/// Build OPTIONS (preflight) response: bare 200 with an empty body
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, 0)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(body::empty())
        })
}

/// Build an HTML error page (404, 500, 501 ...)
///
/// `HEAD` requests get the headers, including the length of the page they
/// would have received, but no body.
pub fn build_error_response(status: StatusCode, message: &str, is_head: bool) -> Response<ResponseBody> {
    let page = render_error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(page)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, ERROR_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(body::empty());
            *fallback.status_mut() = status;
            fallback
        })
}

fn render_error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <title>Error response</title>
    </head>
    <body>
        <h1>Error response</h1>
        <p>Error code: {code}</p>
        <p>Message: {message}.</p>
        <p>Error code explanation: {code} - {reason}.</p>
    </body>
</html>
"#,
        code = status.as_u16(),
        message = escape_html(message),
        reason = escape_html(reason),
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
