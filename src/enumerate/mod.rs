// src/enumerate/mod.rs
// =============================================================================
// This module discovers which pages exist.
//
// Submodules:
// - sources: the MetadataSource trait and its directory/manifest backends
// - paths: enumeration over a catalog and the final crawl plan
// =============================================================================

mod paths;
mod sources;

pub use paths::{enumerate, plan_pages};
pub use sources::{DirectorySource, ManifestSource, MetadataSource};
