//! HTTP protocol layer module
//!
//! Header injection, MIME detection, path translation and response builders,
//! decoupled from request routing.

pub mod body;
pub mod cors;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use body::ResponseBody;
pub use cors::with_cors;
pub use path::{translate_path, TranslatedPath};
pub use response::{
    build_error_response, build_file_response, build_html_response, build_options_response,
    build_redirect_response,
};
