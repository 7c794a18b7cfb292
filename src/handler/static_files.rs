//! Static file serving module
//!
//! Resolves a request path under the document root and produces the file,
//! an index file, a directory listing, a trailing-slash redirect or a 404.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, ResponseBody, TranslatedPath};
use crate::logger;
use hyper::{Response, StatusCode};
use std::io;
use std::path::Path;
use tokio::fs;

const NOT_FOUND_MESSAGE: &str = "File not found";
const LISTING_DENIED_MESSAGE: &str = "No permission to list directory";

/// Serve a GET/HEAD request from the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let translated = http::translate_path(&state.root, ctx.path);

    match fs::metadata(&translated.fs_path).await {
        Ok(meta) if meta.is_dir() => {
            serve_directory(ctx, &translated, &state.config.http.index_files).await
        }
        // A file addressed as if it were a directory
        Ok(_) if translated.trailing_slash => not_found(ctx),
        Ok(_) => serve_file(ctx, &translated.fs_path).await,
        Err(_) => not_found(ctx),
    }
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    translated: &TranslatedPath,
    index_files: &[String],
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        // Collapse leading slashes: `//host` in Location is protocol-relative
        let path = ctx.path.trim_start_matches('/');
        let location = match ctx.query {
            Some(q) => format!("/{path}/?{q}"),
            None => format!("/{path}/"),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in index_files {
        let index_path = translated.fs_path.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::read_entries(&translated.fs_path).await {
        Ok(entries) => {
            let page = listing::render_listing(&translated.url_path, &entries);
            http::build_html_response(page, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot list directory '{}': {e}",
                translated.fs_path.display()
            ));
            http::build_error_response(StatusCode::NOT_FOUND, LISTING_DENIED_MESSAGE, ctx.is_head)
        }
    }
}

/// Serve a single regular file, streamed from disk
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<ResponseBody> {
    let opened = async {
        let file = fs::File::open(file_path).await?;
        let len = file.metadata().await?.len();
        Ok::<_, io::Error>((file, len))
    };

    match opened.await {
        Ok((file, len)) => http::build_file_response(
            file,
            len,
            mime::content_type_for(file_path),
            ctx.is_head,
        ),
        Err(e) => read_error_response(ctx, file_path, &e),
    }
}

/// Missing or unopenable files are 404; anything else is a server error
fn read_error_response(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    err: &io::Error,
) -> Response<ResponseBody> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput => {
            not_found(ctx)
        }
        _ => {
            logger::log_error(&format!(
                "Failed to read file '{}': {err}",
                file_path.display()
            ));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                ctx.is_head,
            )
        }
    }
}

fn not_found(ctx: &RequestContext<'_>) -> Response<ResponseBody> {
    http::build_error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::body::{Body, Bytes};
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
    use std::path::PathBuf;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cors-static-server-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            query: None,
            is_head: false,
        }
    }

    async fn body_of(resp: Response<ResponseBody>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serves_file_bytes_with_type() {
        let root = temp_root("file");
        std::fs::write(root.join("index.html"), "<h1>Hi</h1>").unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/index.html"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "11");
        assert_eq!(body_of(resp).await, Bytes::from_static(b"<h1>Hi</h1>"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let root = temp_root("missing");
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/missing.txt"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_of(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("File not found"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let root = temp_root("slash");
        std::fs::write(root.join("a.txt"), "a").unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/a.txt/"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let root = temp_root("redirect");
        std::fs::create_dir(root.join("docs")).unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let request = RequestContext {
            path: "/docs",
            query: Some("x=1"),
            is_head: false,
        };
        let resp = serve(&request, &state).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/?x=1");
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_redirect_location_stays_on_this_host() {
        let root = temp_root("redirect-host");
        std::fs::create_dir(root.join("assets")).unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("//assets"), &state).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/assets/");

        let request = RequestContext {
            path: "///assets",
            query: Some("v=2"),
            is_head: false,
        };
        let resp = serve(&request, &state).await;
        assert_eq!(resp.headers()[LOCATION], "/assets/?v=2");
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_large_file_is_streamed_intact() {
        let root = temp_root("large");
        let content: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(root.join("bundle.js"), &content).unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/bundle.js"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "300000");
        assert_eq!(resp.body().size_hint().exact(), Some(300_000));
        assert_eq!(body_of(resp).await.to_vec(), content);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_directory_prefers_index_file() {
        let root = temp_root("index");
        std::fs::create_dir(root.join("app")).unwrap();
        std::fs::write(root.join("app").join("index.htm"), "legacy").unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/app/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, Bytes::from_static(b"legacy"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let root = temp_root("listing");
        std::fs::write(root.join("b.txt"), "b").unwrap();
        std::fs::write(root.join("A.txt"), "a").unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let resp = serve(&ctx("/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let page = String::from_utf8(body_of(resp).await.to_vec()).unwrap();
        assert!(page.contains("Directory listing for /"));
        let a = page.find("A.txt").unwrap();
        let b = page.find("b.txt").unwrap();
        assert!(a < b);
        assert!(page.contains("<a href=\"sub/\">sub/</a>"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_head_sends_length_without_body() {
        let root = temp_root("head");
        std::fs::write(root.join("data.json"), "{\"ok\":true}").unwrap();
        let state = AppState::with_root(&Config::default(), &root).unwrap();

        let request = RequestContext {
            path: "/data.json",
            query: None,
            is_head: true,
        };
        let resp = serve(&request, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "11");
        assert!(body_of(resp).await.is_empty());
        let _ = std::fs::remove_dir_all(&root);
    }
}
