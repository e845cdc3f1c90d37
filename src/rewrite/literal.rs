// src/rewrite/literal.rs
// =============================================================================
// Text substitution of bundle-root references.
//
// Inline scripts and bundled CSS/JS refer to assets with literals such as
//   loadScript("/static/frontend/frontend.js")
//   url(/third_party/fonts/font.woff2)
// We find an opener character immediately followed by a bundle root and
// swap the leading slash for a relative prefix:
//   "/static/   ->   "../static/
//
// This is plain substring replacement, not a JS or CSS parser. A string
// that merely contains "/static/ in some other sense is rewritten too.
// =============================================================================

use crate::config::BUNDLE_ROOTS;

/// Quote characters that open a string literal
pub const QUOTES: [char; 2] = ['"', '\''];

/// Quotes plus the opening parenthesis of an unquoted CSS url(...)
pub const QUOTES_AND_PAREN: [char; 3] = ['"', '\'', '('];

// Rewrites every `<opener>/<root>/...` occurrence to `<opener><prefix><root>/...`
//
// Works on raw bytes: openers and roots are ASCII, so a stray Latin-1 byte
// elsewhere in the file doesn't stop the rewrite.
pub fn relativize_roots(text: &[u8], openers: &[char], prefix: &str) -> Vec<u8> {
    let mut out = text.to_vec();

    for root in BUNDLE_ROOTS {
        // root is "/static/", the replacement keeps "static/"
        let bare = &root[1..];
        for &opener in openers {
            let old = format!("{}{}", opener, root);
            let new = format!("{}{}{}", opener, prefix, bare);
            out = replace_all(&out, old.as_bytes(), new.as_bytes());
        }
    }

    out
}

// Byte-level counterpart of str::replace
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;

    while i < haystack.len() {
        if haystack[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }

    out
}

// Rewrites quoted bundle paths inside an inline <script> body
pub fn relativize_script_text(script: &str, prefix: &str) -> String {
    let rewritten = relativize_roots(script.as_bytes(), &QUOTES, prefix);
    // Only ASCII was swapped for ASCII, so the text is still valid UTF-8
    match String::from_utf8(rewritten) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quoted_static_path() {
        assert_eq!(
            relativize_script_text(r#"loadScript("/static/frontend/frontend.js")"#, "../"),
            r#"loadScript("../static/frontend/frontend.js")"#
        );
    }

    #[test]
    fn test_single_quoted_static_path() {
        assert_eq!(
            relativize_script_text("loadScript('/static/frontend/frontend.js')", "../"),
            "loadScript('../static/frontend/frontend.js')"
        );
    }

    #[test]
    fn test_third_party_path() {
        assert_eq!(
            relativize_script_text(
                r#"loadScript("/third_party/dialog-polyfill/dialog-polyfill.js")"#,
                "../../"
            ),
            r#"loadScript("../../third_party/dialog-polyfill/dialog-polyfill.js")"#
        );
    }

    #[test]
    fn test_root_prefix() {
        assert_eq!(
            relativize_script_text(r#"loadScript("/static/frontend/frontend.js")"#, "./"),
            r#"loadScript("./static/frontend/frontend.js")"#
        );
    }

    #[test]
    fn test_no_matching_paths() {
        let script = r#"console.log("hello world")"#;
        assert_eq!(relativize_script_text(script, "../"), script);
    }

    #[test]
    fn test_multiple_paths_in_one_script() {
        assert_eq!(
            relativize_script_text(
                r#"loadScript("/static/a.js"); loadScript("/third_party/b.js")"#,
                "../"
            ),
            r#"loadScript("../static/a.js"); loadScript("../third_party/b.js")"#
        );
    }

    #[test]
    fn test_scripts_ignore_unquoted_paths() {
        // Only the CSS flavour looks at url( openers
        let text = "x = (/static/a.js)";
        assert_eq!(relativize_script_text(text, "../"), text);
        assert_eq!(
            relativize_roots(text.as_bytes(), &QUOTES_AND_PAREN, "../"),
            b"x = (../static/a.js)"
        );
    }

    #[test]
    fn test_replace_all_on_bytes() {
        assert_eq!(replace_all(b"a-b-a", b"a", b"xy"), b"xy-b-xy");
        assert_eq!(replace_all(b"\xe9(/static/", b"(/static/", b"(static/"), b"\xe9(static/");
        assert_eq!(replace_all(b"", b"a", b"b"), b"");
    }

    #[test]
    fn test_other_absolute_paths_are_left_alone() {
        let text = r#"fetch("/api/search")"#;
        assert_eq!(relativize_script_text(text, "../"), text);
    }
}
