//! Request path translation
//!
//! Maps a URL path onto the document root. The result can never escape the
//! root: `..` only pops segments that were pushed before it, and any segment
//! that is not a single plain file name is discarded.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// A request path resolved against the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Filesystem location under the root
    pub fs_path: PathBuf,
    /// Percent-decoded URL path, without query or fragment
    pub url_path: String,
    /// Whether the URL path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a raw request target (path, optionally with query/fragment)
pub fn translate_path(root: &Path, request_target: &str) -> TranslatedPath {
    let raw_path = strip_query(request_target);
    let url_path = percent_decode_str(raw_path).decode_utf8_lossy().into_owned();
    let trailing_slash = url_path.trim_end().ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut fs_path = root.to_path_buf();
    for segment in segments.into_iter().filter(|s| is_plain_name(s)) {
        fs_path.push(segment);
    }

    TranslatedPath {
        fs_path,
        url_path,
        trailing_slash,
    }
}

/// Remove `?query` and `#fragment` from a request target
pub fn strip_query(request_target: &str) -> &str {
    request_target
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
}

/// True when the segment is exactly one normal path component
fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
