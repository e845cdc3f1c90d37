// src/bundle/dir.rs
// =============================================================================
// A bundle backed by a directory on disk.
//
// jwalk walks the tree; with sort(true) the order is deterministic and every
// directory is yielded before its contents.
// =============================================================================

use super::{AssetBundle, BundleItem};
use crate::error::ExportError;
use jwalk::WalkDir;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

// "frontend/homepage/homepage.css" on every platform
fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl AssetBundle for DirBundle {
    fn walk(&self) -> Result<Vec<BundleItem>, ExportError> {
        if !self.root.is_dir() {
            return Err(ExportError::filesystem(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "bundle directory missing"),
            ));
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(&self.root).sort(true).skip_hidden(false) {
            let entry = entry.map_err(|e| {
                ExportError::filesystem(&self.root, std::io::Error::other(e.to_string()))
            })?;

            // Depth 0 is the bundle root itself
            if entry.depth == 0 {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path.as_path());
            items.push(BundleItem {
                path: slash_path(relative),
                is_dir: entry.file_type().is_dir(),
            });
        }

        Ok(items)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| ExportError::filesystem(full, e))
    }
}
