//! Request handler module
//!
//! Maps requests onto the served directory tree.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
