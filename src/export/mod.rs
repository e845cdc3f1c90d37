// src/export/mod.rs
// =============================================================================
// This module wires the pieces into one export run.
//
// Submodules:
// - pipeline: the Exporter (pages, then bundles, then favicon)
// - progress: the optional progress sink
// - report: what the run did, for the table or JSON output
// =============================================================================

mod pipeline;
mod progress;
mod report;

pub use pipeline::{BundleMount, Exporter};
pub use progress::{ProgressSink, StderrProgress};
pub use report::ExportReport;
