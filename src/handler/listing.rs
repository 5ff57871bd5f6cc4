//! Directory listing page

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const HREF: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

impl Entry {
    fn link(&self) -> String {
        let mut href = utf8_percent_encode(&self.name, HREF).to_string();
        if self.is_dir {
            href.push('/');
        }
        href
    }

    fn display(&self) -> String {
        let mut shown = escape_html(&self.name);
        if self.is_dir {
            shown.push('/');
        } else if self.is_symlink {
            shown.push('@');
        }
        shown
    }
}

/// Render an HTML listing of `dir`, titled with the decoded request path
///
/// Entries whose names are not valid UTF-8 are left out: request paths are
/// decoded as UTF-8, so a link to them could never resolve.
pub async fn render_listing(dir: &Path, display_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let file_type = entry.file_type().await?;
        // Follow symlinks so linked directories get a trailing slash
        let is_dir = fs::metadata(entry.path())
            .await
            .map_or(file_type.is_dir(), |m| m.is_dir());
        entries.push(Entry {
            name,
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.link(),
            entry.display()
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = std::env::temp_dir().join(format!("devserve-listing-raw-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(OsStr::from_bytes(b"bad\xffname.txt")), "x").unwrap();
        std::fs::write(dir.join("good.txt"), "y").unwrap();

        let html = render_listing(&dir, "/").await.unwrap();
        assert!(html.contains("href=\"good.txt\""));
        assert!(!html.contains("name.txt"));
        assert!(!html.contains('\u{FFFD}'));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_render_listing() {
        let dir = std::env::temp_dir().join(format!("devserve-listing-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("Assets")).unwrap();
        std::fs::write(dir.join("b file.txt"), "b").unwrap();
        std::fs::write(dir.join("a.html"), "a").unwrap();
        std::fs::write(dir.join("<x>.js"), "x").unwrap();

        let html = render_listing(&dir, "/docs/").await.unwrap();

        assert!(html.contains("<title>Directory listing for /docs/</title>"));
        assert!(html.contains("<li><a href=\"b%20file.txt\">b file.txt</a></li>"));
        assert!(html.contains("<li><a href=\"Assets/\">Assets/</a></li>"));
        assert!(html.contains("<li><a href=\"%3Cx%3E.js\">&lt;x&gt;.js</a></li>"));

        // Case-insensitive ordering: <x>.js, a.html, Assets/, b file.txt
        let a = html.find("a.html").unwrap();
        let assets = html.find("Assets/").unwrap();
        let b = html.find("b file.txt").unwrap();
        assert!(a < assets && assets < b);

        std::fs::remove_dir_all(&dir).ok();
    }
}
