//! Static file serving module
//!
//! Resolves a request path under the root, then serves a file, an index
//! file, a directory listing, or a 404.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::handler::{listing, path};
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve whatever the request path names under the root directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;
    let request_path = path::rewrite_root(ctx.path, routes.rewrite_root);

    let Some(target) = locate(&state.root, request_path).await else {
        return http::build_404_response(ctx.is_head);
    };

    let metadata = match fs::metadata(&target).await {
        Ok(m) => m,
        Err(_) => return http::build_404_response(ctx.is_head),
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, request_path, &target).await;
    }

    // A trailing slash names a directory, never a file
    if request_path.ends_with('/') {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, &target, &metadata).await
}

/// Resolve and canonicalize a request path, rejecting anything outside the root
async fn locate(root: &Path, request_path: &str) -> Option<PathBuf> {
    let candidate = path::resolve(root, request_path);

    // Missing files are the common case (404), not worth a log line
    let canonical = fs::canonicalize(&candidate).await.ok()?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return None;
    }

    Some(canonical)
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    request_path: &str,
    dir: &Path,
) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;

    // Relative links in pages and listings need the trailing slash
    if !request_path.ends_with('/') {
        return http::build_redirect_response(&directory_location(request_path, ctx.query));
    }

    for index_file in &routes.index_files {
        let index_path = dir.join(index_file);
        if let Ok(metadata) = fs::metadata(&index_path).await {
            if metadata.is_file() {
                return serve_file(ctx, &index_path, &metadata).await;
            }
        }
    }

    if !routes.list_directories {
        return http::build_404_response(ctx.is_head);
    }

    let display_path = percent_decode_str(request_path).decode_utf8_lossy();
    match listing::render_listing(dir, &display_path).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response(ctx.is_head)
        }
    }
}

/// Slash-terminated redirect target for a directory request
///
/// Leading slashes are collapsed so `//host/dir` can never become a
/// protocol-relative `Location` pointing at another host.
pub fn directory_location(request_path: &str, query: Option<&str>) -> String {
    let trimmed = request_path.trim_start_matches('/');
    match query {
        Some(q) => format!("/{trimmed}/?{q}"),
        None => format!("/{trimmed}/"),
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let Some(modified) = modified {
        if cache::is_not_modified(ctx.if_modified_since.as_deref(), modified) {
            return http::build_304_response(last_modified.as_deref());
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response(ctx.is_head);
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    http::build_file_response(
        Bytes::from(content),
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_location() {
        assert_eq!(directory_location("/css", None), "/css/");
        assert_eq!(directory_location("/css", Some("x=1")), "/css/?x=1");
        assert_eq!(directory_location("//evil.example/..%2f", None), "/evil.example/..%2f/");
        assert_eq!(directory_location("///a", Some("q")), "/a/?q");
    }
}
