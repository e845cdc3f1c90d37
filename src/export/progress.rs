// src/export/progress.rs
// =============================================================================
// Progress reporting for an export run.
//
// The pipeline doesn't print anything itself; it calls an optional sink.
// The CLI plugs in StderrProgress, tests plug in nothing or a recorder.
// =============================================================================

pub trait ProgressSink: Sync {
    /// Called once before the first page, with the number of planned pages
    fn start(&self, total: usize);

    /// Called as each page starts; `index` counts from 1
    fn page(&self, index: usize, total: usize, url_path: &str);

    /// Called when a later stage (assets, favicon) begins
    fn stage(&self, message: &str);
}

// Prints "  [3/120] /net/http" lines on stderr, keeping stdout free for
// the JSON report
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn start(&self, total: usize) {
        eprintln!("Generating {} pages...", total);
    }

    fn page(&self, index: usize, total: usize, url_path: &str) {
        eprintln!("  [{}/{}] {}", index, total, url_path);
    }

    fn stage(&self, message: &str) {
        eprintln!("{}", message);
    }
}
