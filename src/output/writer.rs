// src/output/writer.rs
// =============================================================================
// Writes output files.
//
// Parent directories are created first (create_dir_all is idempotent) and
// an existing file is overwritten. We never read back what we wrote.
// =============================================================================

use crate::error::ExportError;
use std::path::Path;
use tokio::fs;

// Writes bytes to `path`, creating any missing parent directories
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    fs::write(path, bytes)
        .await
        .map_err(|e| ExportError::filesystem(path, e))
}

// Creates a directory and all of its parents
pub async fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| ExportError::filesystem(dir, e))
}
