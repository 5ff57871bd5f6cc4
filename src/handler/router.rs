//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, CORS header injection and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderName, HeaderValue, IF_MODIFIED_SINCE, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Generic over the request body since no request body is ever read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let enable_cors = state.config.http.enable_cors;

    let mut response = match check_http_method(req.method(), enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: req.uri().path(),
                query: req.uri().query(),
                is_head: req.method() == Method::HEAD,
                if_modified_since: header_string(&req, IF_MODIFIED_SINCE),
            };
            static_files::serve(&ctx, &state).await
        }
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    // Appended last so every status and method carries them
    if enable_cors {
        http::apply_cors_headers(response.headers_mut());
    }

    if state.config.logging.access_log {
        log_access(&req, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// Methods allowed by this server
const fn allowed_methods(enable_cors: bool) -> &'static str {
    if enable_cors {
        "GET, HEAD, OPTIONS"
    } else {
        "GET, HEAD"
    }
}

/// Check HTTP method and return early response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS if enable_cors => Some(http::build_options_response(allowed_methods(
            enable_cors,
        ))),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(allowed_methods(enable_cors)))
        }
    }
}

fn header_string<B>(req: &Request<B>, name: HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr,
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(req, REFERER);
    entry.user_agent = header_string(req, USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
