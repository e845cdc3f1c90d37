// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so --json output on stdout stays clean)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = all pages written, 1 = some pages failed,
//    2 = error that stopped the run)
//
// Rust concepts used:
// - async/await: rendering talks to the site over HTTP
// - Box<dyn Trait>: the list of metadata sources is built at runtime
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{CatalogArgs, Cli, Commands};
use sitefreeze::bundle::DirBundle;
use sitefreeze::config::ExportConfig;
use sitefreeze::crawl::HttpRouter;
use sitefreeze::enumerate::{enumerate, plan_pages, DirectorySource, ManifestSource, MetadataSource};
use sitefreeze::export::{BundleMount, ExportReport, Exporter, StderrProgress};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every page written
//   Ok(1) = some pages failed (the rest of the site was still written)
//   Err   = the run could not start or had to stop
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Export {
            base_url,
            out,
            catalog,
            static_dir,
            third_party_dir,
            config,
            jobs,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(jobs) = jobs {
                config.jobs = jobs.max(1);
            }
            let bundles = BundleDirs {
                static_dir,
                third_party_dir,
            };
            handle_export(&base_url, &out, &catalog, bundles, &config, json).await
        }
        Commands::Paths {
            catalog,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            handle_paths(&catalog, &config, json)
        }
    }
}

// The on-disk directories published as /static/ and /third_party/
struct BundleDirs {
    static_dir: Option<PathBuf>,
    third_party_dir: Option<PathBuf>,
}

// Handles the 'export' subcommand
async fn handle_export(
    base_url: &str,
    out: &Path,
    catalog: &CatalogArgs,
    bundles: BundleDirs,
    config: &ExportConfig,
    json: bool,
) -> Result<i32> {
    let unit_paths = collect_unit_paths(catalog)?;
    tracing::info!(units = unit_paths.len(), "catalog enumerated");

    let router = HttpRouter::new(base_url, Duration::from_secs(config.request_timeout_secs))?;
    let progress = StderrProgress;

    let mut exporter = Exporter::new(&router, config, out);
    // Progress lines would interleave with nothing useful in JSON mode
    if !json {
        exporter = exporter.with_progress(&progress);
    }
    for (mount, dir) in [
        ("static", bundles.static_dir),
        ("third_party", bundles.third_party_dir),
    ] {
        if let Some(dir) = dir {
            let bundle = DirBundle::new(dir);
            if !bundle.root().is_dir() {
                bail!("{} directory {} does not exist", mount, bundle.root().display());
            }
            tracing::debug!(mount, root = %bundle.root().display(), "bundle mounted");
            exporter = exporter.with_bundle(BundleMount::new(mount, bundle));
        }
    }

    let report = exporter
        .run(&unit_paths)
        .await
        .with_context(|| format!("exporting to {}", exporter.out_dir().display()))?;

    print_report(&report, exporter.out_dir(), json)?;

    if report.is_ok() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'paths' subcommand: the plan an export would follow
fn handle_paths(catalog: &CatalogArgs, config: &ExportConfig, json: bool) -> Result<i32> {
    let unit_paths = collect_unit_paths(catalog)?;
    let plan = plan_pages(&config.static_pages, &unit_paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for url_path in &plan {
            println!("{}", url_path);
        }
    }
    Ok(0)
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) => ExportConfig::load(path),
        None => Ok(ExportConfig::default()),
    }
}

// Entries from --entry and --entries-file, run through every source
fn collect_unit_paths(catalog: &CatalogArgs) -> Result<Vec<String>> {
    let mut entries = catalog.entries.clone();
    if let Some(file) = &catalog.entries_file {
        let raw = std::fs::read_to_string(file)
            .with_context(|| format!("reading entries file {}", file.display()))?;
        entries.extend(parse_entries(&raw));
    }

    let sources = build_sources(catalog)?;
    if !entries.is_empty() && sources.is_empty() {
        bail!("catalog entries given but no --manifest or --source-dir to look them up in");
    }

    Ok(enumerate(&entries, &sources))
}

// The manifest is asked first, then each source directory in order
fn build_sources(catalog: &CatalogArgs) -> Result<Vec<Box<dyn MetadataSource>>> {
    let mut sources: Vec<Box<dyn MetadataSource>> = Vec::new();
    if let Some(manifest) = &catalog.manifest {
        sources.push(Box::new(ManifestSource::load(manifest)?));
    }
    for dir in &catalog.source_dirs {
        sources.push(Box::new(DirectorySource::new(
            dir.clone(),
            catalog.extension.clone(),
        )));
    }
    Ok(sources)
}

// One entry per line; blank lines and '#' comments are ignored
fn parse_entries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// Prints the report either as a table or JSON
fn print_report(report: &ExportReport, out: &Path, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report, out);
    }
    Ok(())
}

// Prints failures (if any) and a summary in the terminal
fn print_table(report: &ExportReport, out: &Path) {
    if !report.failures.is_empty() {
        println!("{:<50} {:<55}", "PAGE", "ERROR");
        println!("{}", "=".repeat(105));

        for failure in &report.failures {
            // Truncate long paths so the columns line up
            let path_display = if failure.url_path.chars().count() > 47 {
                let head: String = failure.url_path.chars().take(47).collect();
                format!("{}...", head)
            } else {
                failure.url_path.clone()
            };
            println!("{:<50} {:<55}", path_display, failure.error);
        }
        println!();
    }

    println!("📊 Summary:");
    println!("   📄 Pages written: {}", report.pages_written);
    println!("   📦 Assets written: {}", report.assets_written);
    println!("   ❌ Failed pages: {}", report.failures.len());
    println!("   📁 Output: {}", out.display());
}
