// src/rewrite/mod.rs
// =============================================================================
// This module turns absolute site references into relative ones.
//
// Submodules:
// - html: DOM rewrite of a rendered page (URL attributes, CSP tag, scripts)
// - asset: text rewrite of bundled CSS/JS files
// - literal: the shared "quote + bundle root" substitution
//
// Both rewriters are pure functions of (bytes, path) so they are easy to
// test without a backend or a filesystem.
// =============================================================================

mod asset;
mod html;
mod literal;

pub use asset::{asset_depth, is_rewritable_asset, transform_asset};
pub use html::{is_rewrite_target, is_url_attr, relativize_url, transform_html};
pub use literal::relativize_script_text;
