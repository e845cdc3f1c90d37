// src/output/mod.rs
// =============================================================================
// This module decides where things land in the output tree and writes them.
//
// Submodules:
// - mapper: URL path -> file path, page depth, relative prefixes
// - writer: creates parent directories and writes bytes
//
// Every page is written as <path>/index.html, so a page's depth in the
// output tree equals the number of segments in its URL path. The rewriters
// rely on that to build correct relative links.
// =============================================================================

mod mapper;
mod writer;

pub use mapper::{depth, map_path, normalize_url_path, parent_hops, relative_prefix};
pub use writer::{ensure_dir, write_output};
