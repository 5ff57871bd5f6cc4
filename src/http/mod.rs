//! HTTP protocol layer module
//!
//! Response builders, content types, conditional requests and CORS headers,
//! independent of how paths are resolved.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use cors::apply_cors_headers;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_file_response,
    build_html_response, build_options_response, build_redirect_response,
};
