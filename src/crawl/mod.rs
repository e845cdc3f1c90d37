// src/crawl/mod.rs
// =============================================================================
// This module renders pages.
//
// Features:
// - A Router trait: the request/response contract of the rendering backend
// - An HTTP backend (a running site) and an in-memory backend
// - Redirect following with a fixed hop limit
//
// Rust concepts:
// - Traits with async methods: the crawler is generic over its backend
// - Loops instead of recursion for the redirect chain
// =============================================================================

mod render;
mod router;

pub use render::{render, RenderedPage};
pub use router::{HttpRouter, MemoryRouter, Router, RouterResponse};
