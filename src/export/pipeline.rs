// src/export/pipeline.rs
// =============================================================================
// The export run: render every planned page, rewrite it, write it, then copy
// the asset bundles.
//
// How it works:
// 1. Plan the pages (homepage, static pages, unit pages; no duplicates)
// 2. For each page: render -> rewrite (HTML only) -> write
//    A page that fails is reported and skipped; the run goes on.
//    A filesystem failure stops the run.
// 3. Copy each bundle to <out>/<mount>, rewriting CSS/JS
// 4. Copy the favicon to the output root
//
// Pages run one at a time unless `jobs` says otherwise. Running several at
// once is safe because every planned path maps to its own output file.
// =============================================================================

use super::progress::ProgressSink;
use super::report::{ExportReport, PageFailure};
use crate::bundle::{copy_bundle, AssetBundle};
use crate::config::ExportConfig;
use crate::crawl::{render, Router};
use crate::enumerate::plan_pages;
use crate::error::ExportError;
use crate::output::{map_path, write_output};
use crate::rewrite::transform_html;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

// A bundle and the directory name it is published under ("static")
pub struct BundleMount {
    pub name: String,
    pub bundle: Box<dyn AssetBundle>,
}

impl BundleMount {
    pub fn new(name: &str, bundle: impl AssetBundle + 'static) -> Self {
        Self {
            name: name.trim_matches('/').to_string(),
            bundle: Box::new(bundle),
        }
    }
}

pub struct Exporter<'a, R: Router> {
    router: &'a R,
    config: &'a ExportConfig,
    out_dir: PathBuf,
    bundles: Vec<BundleMount>,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a, R: Router> Exporter<'a, R> {
    pub fn new(router: &'a R, config: &'a ExportConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            router,
            config,
            out_dir: out_dir.into(),
            bundles: Vec::new(),
            progress: None,
        }
    }

    pub fn with_bundle(mut self, mount: BundleMount) -> Self {
        self.bundles.push(mount);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    // Runs the whole export for the given unit pages
    pub async fn run(&self, unit_paths: &[String]) -> Result<ExportReport, ExportError> {
        let plan = plan_pages(&self.config.static_pages, unit_paths);
        let total = plan.len();
        let jobs = self.config.jobs.max(1);

        tracing::info!(pages = total, jobs, out = %self.out_dir.display(), "export started");
        if let Some(progress) = self.progress {
            progress.start(total);
        }

        let mut report = ExportReport::default();
        let started = AtomicUsize::new(0);
        let started = &started;

        let mut pages = stream::iter(plan.iter().map(|url_path| async move {
            let index = started.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(progress) = self.progress {
                progress.page(index, total, url_path);
            }
            (url_path, self.export_page(url_path).await)
        }))
        .buffer_unordered(jobs);

        while let Some((url_path, outcome)) = pages.next().await {
            match outcome {
                Ok(()) => report.pages_written += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(path = %url_path, error = %e, "page skipped");
                    report.failures.push(PageFailure {
                        url_path: url_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !self.bundles.is_empty() {
            if let Some(progress) = self.progress {
                progress.stage("Copying static assets...");
            }
        }
        for mount in &self.bundles {
            let written = copy_bundle(mount.bundle.as_ref(), &mount.name, &self.out_dir).await?;
            report.assets_written += written;
        }

        if self.copy_favicon().await? {
            report.assets_written += 1;
        }

        tracing::info!(
            pages = report.pages_written,
            assets = report.assets_written,
            failed = report.failures.len(),
            "export finished"
        );
        if let Some(progress) = self.progress {
            progress.stage(&format!("Static site generated in {}", self.out_dir.display()));
        }

        Ok(report)
    }

    // render -> rewrite -> write for one page
    async fn export_page(&self, url_path: &str) -> Result<(), ExportError> {
        let page = render(self.router, url_path).await?;
        if page.final_path != page.url_path {
            tracing::debug!(path = %page.url_path, target = %page.final_path, "redirected");
        }

        // The file lives at the requested path, so links are made relative
        // to that path even when the content came from a redirect target
        let body = if page.is_html() {
            transform_html(&page.body, &page.url_path)?
        } else {
            page.body
        };

        let dest = self.out_dir.join(map_path(&page.url_path));
        write_output(&dest, &body).await
    }

    // Copies the configured favicon (e.g. "static/shared/icon/favicon.ico")
    // to <out>/favicon.ico. A missing favicon is not an error.
    async fn copy_favicon(&self) -> Result<bool, ExportError> {
        let Some(favicon) = self.config.favicon.as_deref() else {
            return Ok(false);
        };

        let Some((mount_name, path)) = favicon.trim_start_matches('/').split_once('/') else {
            tracing::debug!(favicon, "favicon path has no bundle mount, skipping");
            return Ok(false);
        };

        let Some(mount) = self.bundles.iter().find(|m| m.name == mount_name) else {
            tracing::debug!(favicon, "favicon bundle not mounted, skipping");
            return Ok(false);
        };

        match mount.bundle.read(path) {
            Ok(bytes) => {
                write_output(&self.out_dir.join("favicon.ico"), &bytes).await?;
                Ok(true)
            }
            Err(e) => {
                tracing::debug!(favicon, error = %e, "favicon not found, skipping");
                Ok(false)
            }
        }
    }
}
