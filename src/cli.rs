// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - export: render the whole site into a static directory
// - paths:  print the pages an export would render (dry run)
//
// Both share the catalog arguments (which entries exist and where to look
// them up), so those live in one struct that is flattened into each.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sitefreeze",
    version,
    about = "Freeze a dynamically-rendered docs site into a static, relocatable directory",
    long_about = "sitefreeze renders every page of a running documentation site once, rewrites \
                  all absolute links and asset references to relative ones and embeds a strict \
                  Content-Security-Policy, so the output works from any subdirectory of any \
                  static host."
)]
pub struct Cli {
    /// Log debug details (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the site into a static directory
    ///
    /// Example: sitefreeze export --base-url http://localhost:8080 --out site --entry std
    Export {
        /// Where the running site answers, e.g. http://localhost:8080
        #[arg(long)]
        base_url: String,

        /// Output directory (created if missing, files are overwritten)
        #[arg(long, short)]
        out: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory published as /static/
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Directory published as /third_party/
        #[arg(long)]
        third_party_dir: Option<PathBuf>,

        /// JSON config file (static pages, favicon, jobs, timeout)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pages rendered at once (overrides the config file)
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the pages an export would render
    Paths {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// JSON config file (for its static page list)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

// Which catalog entries exist and which sources describe them
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// A catalog entry to export (repeatable)
    #[arg(long = "entry")]
    pub entries: Vec<String>,

    /// File with one catalog entry per line ('#' starts a comment)
    #[arg(long)]
    pub entries_file: Option<PathBuf>,

    /// JSON manifest mapping entries to unit paths (asked first)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory holding one sub-directory per entry (repeatable)
    #[arg(long = "source-dir")]
    pub source_dirs: Vec<PathBuf>,

    /// Only directories with files of this extension count as units
    #[arg(long)]
    pub extension: Option<String>,
}
