// src/bundle/mod.rs
// =============================================================================
// Read-only asset bundles (static/, third_party/) and copying them out.
//
// A bundle is a file tree we walk once per run. Every directory is recreated
// in the output, CSS/JS files are rewritten to relative paths and all other
// files are copied byte for byte. The source tree is never modified.
//
// Implementations:
// - DirBundle: a directory on disk, walked with jwalk
// - MemoryBundle: files held in memory (tests, embedding)
// =============================================================================

mod dir;
mod memory;

pub use dir::DirBundle;
pub use memory::MemoryBundle;

use crate::error::ExportError;
use crate::output::{ensure_dir, write_output};
use crate::rewrite::{is_rewritable_asset, transform_asset};
use std::path::Path;

// One entry of a walk, path relative to the bundle root with '/' separators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleItem {
    pub path: String,
    pub is_dir: bool,
}

pub trait AssetBundle {
    /// Every directory and file, sorted, parents before their contents
    fn walk(&self) -> Result<Vec<BundleItem>, ExportError>;

    /// Raw bytes of one file
    fn read(&self, path: &str) -> Result<Vec<u8>, ExportError>;
}

// Copies a whole bundle to <out_dir>/<mount>/...
//
// `mount` is the bundle's directory name in the site ("static"), which is
// also what its files are addressed by ("/static/..."). It decides the
// depth used when rewriting CSS/JS. Returns the number of files written.
pub async fn copy_bundle<B: AssetBundle + ?Sized>(
    bundle: &B,
    mount: &str,
    out_dir: &Path,
) -> Result<usize, ExportError> {
    let dest_root = out_dir.join(mount);
    ensure_dir(&dest_root).await?;

    let mut written = 0;
    for item in bundle.walk()? {
        let dest = dest_root.join(&item.path);
        if item.is_dir {
            ensure_dir(&dest).await?;
            continue;
        }

        let mut bytes = bundle.read(&item.path)?;
        let site_path = format!("{}/{}", mount, item.path);
        if is_rewritable_asset(&site_path) {
            bytes = transform_asset(&bytes, &site_path);
        }

        write_output(&dest, &bytes).await?;
        written += 1;
    }

    tracing::debug!(mount, files = written, "bundle copied");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_bundle_rewrites_css_and_js_only() {
        let bundle = MemoryBundle::new()
            .file(
                "frontend/homepage/homepage.css",
                "background: url(/static/shared/icon/search.svg)",
            )
            .file("frontend/frontend.js", r#"import "/third_party/x.js""#)
            .file("shared/notes.txt", "see url(/static/a.png)")
            .dir("empty");
        let out = tempfile::tempdir().unwrap();

        let written = copy_bundle(&bundle, "static", out.path()).await.unwrap();
        assert_eq!(written, 3);

        let css =
            std::fs::read_to_string(out.path().join("static/frontend/homepage/homepage.css"))
                .unwrap();
        assert_eq!(css, "background: url(../../../static/shared/icon/search.svg)");

        let js = std::fs::read_to_string(out.path().join("static/frontend/frontend.js")).unwrap();
        assert_eq!(js, r#"import "../../third_party/x.js""#);

        let txt = std::fs::read_to_string(out.path().join("static/shared/notes.txt")).unwrap();
        assert_eq!(txt, "see url(/static/a.png)");

        assert!(out.path().join("static/empty").is_dir());
    }
}
