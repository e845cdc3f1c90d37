// src/enumerate/sources.rs
// =============================================================================
// Metadata sources: where we learn which pages a catalog entry has.
//
// A catalog entry is a symbolic name such as "github.com/user/repo". A
// source answers "which sub-units (sub-packages, sub-directories) does this
// entry have?" with a list of unit paths, or an error if it knows nothing
// about the entry.
//
// Implementations:
// - DirectorySource: scans <root>/<entry> on disk; every directory holding
//   files is a unit
// - ManifestSource: a JSON file listing the units of each entry
// =============================================================================

use crate::error::ExportError;
use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub trait MetadataSource {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Unit paths belonging to `entry`, e.g. ["net", "net/http"]
    fn unit_paths(&self, entry: &str) -> Result<Vec<String>, ExportError>;
}

// -----------------------------------------------------------------------------
// DirectorySource
// -----------------------------------------------------------------------------

pub struct DirectorySource {
    name: String,
    root: PathBuf,
    /// Only files with this extension make a directory a unit (None = any)
    extension: Option<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, extension: Option<String>) -> Self {
        let root = root.into();
        Self {
            name: format!("dir:{}", root.display()),
            root,
            extension: extension.map(|e| e.trim_start_matches('.').to_string()),
        }
    }

    fn counts(&self, file: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(ext) => file.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
        }
    }

    fn source_err(&self, entry: &str, reason: impl Into<String>) -> ExportError {
        ExportError::EnumerationSource {
            source_name: self.name.clone(),
            entry: entry.to_string(),
            reason: reason.into(),
        }
    }
}

impl MetadataSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_paths(&self, entry: &str) -> Result<Vec<String>, ExportError> {
        let entry = entry.trim_matches('/');
        let entry_dir = self.root.join(entry);
        if entry.is_empty() || !entry_dir.is_dir() {
            return Err(self.source_err(entry, "no such directory"));
        }

        // Hidden files and directories are skipped by jwalk's default
        let mut units = BTreeSet::new();
        for item in WalkDir::new(&entry_dir).sort(true) {
            let item = item.map_err(|e| self.source_err(entry, e.to_string()))?;
            if !item.file_type().is_file() || !self.counts(&item.path()) {
                continue;
            }

            let parent = item.parent_path();
            let relative = parent.strip_prefix(&entry_dir).unwrap_or(parent);
            let mut unit = entry.to_string();
            for component in relative.components() {
                unit.push('/');
                unit.push_str(&component.as_os_str().to_string_lossy());
            }
            units.insert(unit);
        }

        Ok(units.into_iter().collect())
    }
}

// -----------------------------------------------------------------------------
// ManifestSource
// -----------------------------------------------------------------------------

// Manifest format:
//   {
//     "github.com/user/repo": ["github.com/user/repo", "github.com/user/repo/pkg"],
//     "std": ["fmt", "net", "net/http"]
//   }
pub struct ManifestSource {
    name: String,
    units: BTreeMap<String, Vec<String>>,
}

impl ManifestSource {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let units = serde_json::from_str(&raw)
            .with_context(|| format!("parsing manifest {}", path.display()))?;

        Ok(Self {
            name: format!("manifest:{}", path.display()),
            units,
        })
    }

    pub fn from_map(name: &str, units: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            units,
        }
    }
}

impl MetadataSource for ManifestSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_paths(&self, entry: &str) -> Result<Vec<String>, ExportError> {
        self.units
            .get(entry)
            .cloned()
            .ok_or_else(|| ExportError::EnumerationSource {
                source_name: self.name.clone(),
                entry: entry.to_string(),
                reason: "entry not listed".to_string(),
            })
    }
}
