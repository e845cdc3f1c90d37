// src/output/mapper.rs
// =============================================================================
// Pure functions that tie URL paths to the output tree.
//
// Layout rules:
//   "/"              -> index.html
//   "/about"         -> about/index.html
//   "/net/http"      -> net/http/index.html
//   "/favicon.ico"   -> favicon.ico        (has an extension, kept verbatim)
//
// Because extensionless pages become directories, a page at depth N needs
// N "../" hops to get back to the output root.
// =============================================================================

use std::path::{Path, PathBuf};

// Number of non-empty segments in a URL path
//
// Examples:
//   "/"          -> 0
//   "/about"     -> 1
//   "/net/http"  -> 2
pub fn depth(url_path: &str) -> usize {
    url_path.split('/').filter(|s| !s.is_empty()).count()
}

// The prefix that leads from a page back to the output root
//
// Examples:
//   depth 0 -> "./"
//   depth 1 -> "../"
//   depth 2 -> "../../"
pub fn relative_prefix(depth: usize) -> String {
    if depth == 0 {
        "./".to_string()
    } else {
        parent_hops(depth)
    }
}

// Plain "../" repetitions, empty at depth 0.
// Assets use this form: a root-level stylesheet refers to "static/x.png".
pub fn parent_hops(depth: usize) -> String {
    "../".repeat(depth)
}

// Brings a unit or page string into URL path form:
// leading slash, no trailing slash, no empty segments.
//
// Examples:
//   "net/http"   -> "/net/http"
//   "/about/"    -> "/about"
//   ""           -> "/"
pub fn normalize_url_path(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

// Maps a URL path to a file path relative to the output root
pub fn map_path(url_path: &str) -> PathBuf {
    let clean = url_path.trim_start_matches('/');
    if clean.is_empty() {
        return PathBuf::from("index.html");
    }

    let relative: PathBuf = clean.split('/').filter(|s| !s.is_empty()).collect();

    // Files like favicon.ico or bundle assets keep their original name
    if Path::new(clean).extension().is_some() {
        return relative;
    }

    relative.join("index.html")
}
