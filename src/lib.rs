//! devserve - a local static-file server for frontend development
//!
//! Serves a directory over HTTP/1.1, optionally answering CORS preflights and
//! tagging every response with permissive cross-origin headers.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServerError;
