// src/lib.rs
// =============================================================================
// The export engine behind the `sitefreeze` CLI.
//
// Pipeline: enumerate pages -> render each one through a Router -> rewrite
// absolute references to relative ones -> write under the output directory,
// then copy the asset bundles.
//
// Modules:
// - enumerate: which pages exist (catalog entries -> unit paths)
// - crawl: the Router contract, backends and redirect following
// - rewrite: HTML and CSS/JS rewriting
// - output: URL path -> file path mapping and writes
// - bundle: read-only asset trees and copying them out
// - export: the Exporter that runs it all
// =============================================================================

pub mod bundle;
pub mod config;
pub mod crawl;
pub mod enumerate;
pub mod error;
pub mod export;
pub mod output;
pub mod rewrite;
