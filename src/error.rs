// src/error.rs
// =============================================================================
// Error types for the crawl-and-rewrite engine.
//
// How failures are treated by the export pipeline:
// - EnumerationSource: that catalog entry is skipped, enumeration continues
// - Backend / TooManyRedirects / OffSiteRedirect / UnexpectedStatus /
//   MalformedHtml: that single page is skipped and reported
// - Filesystem: the whole run stops (partial output is not a safe state)
//
// The engine uses these typed errors; the CLI plumbing around it uses
// anyhow::Result and converts at the edges.
// =============================================================================

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A metadata source could not answer for a catalog entry
    #[error("source '{source_name}' has no data for '{entry}': {reason}")]
    EnumerationSource {
        source_name: String,
        entry: String,
        reason: String,
    },

    /// The rendering backend failed before producing a response
    #[error("backend failed for {path}: {reason}")]
    Backend { path: String, reason: String },

    #[error("too many redirects for {path} (limit {limit})")]
    TooManyRedirects { path: String, limit: usize },

    /// A redirect pointed outside the site and cannot be frozen
    #[error("{path} redirects off-site to {location}")]
    OffSiteRedirect { path: String, location: String },

    #[error("GET {path} returned status {status}")]
    UnexpectedStatus { path: String, status: StatusCode },

    #[error("malformed HTML for {path}: {source}")]
    MalformedHtml {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Only filesystem failures abort a run; everything else is per page
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::Filesystem { .. })
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
