// src/rewrite/asset.rs
// =============================================================================
// Rewrites bundled CSS and JS files.
//
// A stylesheet at static/frontend/homepage/homepage.css that says
//   background: url(/static/shared/icon/search.svg)
// lives three directories below the output root, so it becomes
//   background: url(../../../static/shared/icon/search.svg)
//
// Only .css and .js files are touched; everything else is copied as is.
// =============================================================================

use super::literal::{relativize_roots, QUOTES_AND_PAREN};
use crate::output::parent_hops;
use std::path::Path;

// True for files whose contents we rewrite (.css and .js)
pub fn is_rewritable_asset(site_path: &str) -> bool {
    matches!(
        Path::new(site_path).extension().and_then(|e| e.to_str()),
        Some("css") | Some("js")
    )
}

// Number of directories between the output root and the file
//
// Examples:
//   "style.css"                              -> 0
//   "static/frontend/frontend.css"           -> 2
//   "static/frontend/homepage/homepage.css"  -> 3
pub fn asset_depth(site_path: &str) -> usize {
    match site_path.trim_start_matches('/').rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir.matches('/').count() + 1,
        _ => 0,
    }
}

// Rewrites absolute bundle references in one CSS/JS file.
// `site_path` is the file's path relative to the output root.
pub fn transform_asset(bytes: &[u8], site_path: &str) -> Vec<u8> {
    let prefix = parent_hops(asset_depth(site_path));
    relativize_roots(bytes, &QUOTES_AND_PAREN, &prefix)
}
