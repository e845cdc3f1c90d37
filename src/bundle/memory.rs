// src/bundle/memory.rs
// In-memory bundle. Parent directories are implied by file paths.

use super::{AssetBundle, BundleItem};
use crate::error::ExportError;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone)]
pub struct MemoryBundle {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let path = path.trim_matches('/').to_string();

        // Register every ancestor directory: "a/b/c.css" -> "a", "a/b"
        let mut end = 0;
        while let Some(i) = path[end..].find('/') {
            end += i;
            self.dirs.insert(path[..end].to_string());
            end += 1;
        }

        self.files.insert(path, bytes.into());
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.dirs.insert(path.trim_matches('/').to_string());
        self
    }
}

impl AssetBundle for MemoryBundle {
    fn walk(&self) -> Result<Vec<BundleItem>, ExportError> {
        let mut items: Vec<BundleItem> = self
            .dirs
            .iter()
            .map(|d| BundleItem {
                path: d.clone(),
                is_dir: true,
            })
            .chain(self.files.keys().map(|f| BundleItem {
                path: f.clone(),
                is_dir: false,
            }))
            .collect();

        // "a" sorts before "a/b", so parents come first
        items.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(items)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError> {
        self.files.get(path).cloned().ok_or_else(|| {
            ExportError::filesystem(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not in bundle"),
            )
        })
    }
}
