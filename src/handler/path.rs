//! Request-to-path mapping
//!
//! Turns a URL path into a location under the served root. The mapping is
//! purely lexical; containment against symlinks is checked after
//! canonicalization in [`crate::handler::static_files`].

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Path served for `/` when root rewriting is enabled
pub const ROOT_INDEX: &str = "/index.html";

/// Apply the `/` -> `/index.html` rewrite
pub fn rewrite_root(path: &str, enabled: bool) -> &str {
    if enabled && path == "/" {
        ROOT_INDEX
    } else {
        path
    }
}

/// Percent-decode and normalize a URL path into its segments
///
/// Empty and `.` segments are dropped, `..` removes the previous segment and
/// never climbs above the root. Bytes that are not valid UTF-8 decode to
/// U+FFFD, so files with such names cannot be requested.
pub fn normalize_segments(path: &str) -> Vec<String> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let mut segments: Vec<String> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s.to_string()),
        }
    }

    segments
}

/// Join the normalized segments of `path` onto `root`
pub fn resolve(root: &Path, path: &str) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for segment in normalize_segments(path) {
        // Backslashes would act as separators on Windows
        if segment.contains('\\') {
            continue;
        }
        resolved.push(segment);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_root() {
        assert_eq!(rewrite_root("/", true), "/index.html");
        assert_eq!(rewrite_root("/", false), "/");
        assert_eq!(rewrite_root("/app.js", true), "/app.js");
    }

    #[test]
    fn test_normalize_segments() {
        assert_eq!(normalize_segments("/css/app.css"), vec!["css", "app.css"]);
        assert_eq!(normalize_segments("//a/./b/"), vec!["a", "b"]);
        assert_eq!(normalize_segments("/a/b/../c"), vec!["a", "c"]);
        assert!(normalize_segments("/").is_empty());
    }

    #[test]
    fn test_traversal_stays_under_root() {
        assert_eq!(normalize_segments("/../../etc/passwd"), vec!["etc", "passwd"]);
        assert_eq!(normalize_segments("/%2e%2e/%2E%2E/secret"), vec!["secret"]);
        assert_eq!(normalize_segments("/a/..%2F..%2Fb"), vec!["b"]);

        let root = Path::new("/srv/www");
        assert_eq!(resolve(root, "/../../etc/passwd"), Path::new("/srv/www/etc/passwd"));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(normalize_segments("/my%20file.txt"), vec!["my file.txt"]);
        assert_eq!(
            resolve(Path::new("/srv"), "/img/caf%C3%A9.png"),
            Path::new("/srv/img/café.png")
        );
    }
}
