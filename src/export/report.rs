// src/export/report.rs
// =============================================================================
// The summary of one export run.
//
// Serializable so the CLI can print it as JSON (--json) as well as a table.
// =============================================================================

use serde::Serialize;

// A page that could not be exported, and why
#[derive(Debug, Clone, Serialize)]
pub struct PageFailure {
    pub url_path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub pages_written: usize,
    pub assets_written: usize,
    pub failures: Vec<PageFailure>,
}

impl ExportReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}
