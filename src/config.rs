// src/config.rs
// =============================================================================
// Process-wide constants and the optional export config file.
//
// The constants never change during a run: the bundle roots we rewrite,
// the URL-bearing attributes, the redirect ceiling and the CSP directive.
//
// ExportConfig holds the knobs a site owner may want to tune. It can be
// loaded from a JSON file (--config) and individual CLI flags override it.
// =============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Absolute roots under which every bundled asset is addressed
pub const BUNDLE_ROOTS: [&str; 2] = ["/static/", "/third_party/"];

/// Attributes whose values are treated as URLs when rewriting HTML
pub const URL_ATTRS: [&str; 5] = ["href", "src", "action", "poster", "data"];

/// Redirect hops followed before a page is given up on
pub const MAX_REDIRECTS: usize = 5;

/// Content-Security-Policy embedded into every generated page.
/// Only same-origin scripts, styles, images and fonts; nothing else.
pub const CSP_CONTENT: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; \
     font-src 'self'; \
     connect-src 'none'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'none'";

// Tunable settings for one export run
//
// Every field has a default so an empty JSON object `{}` is a valid config.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Informational pages rendered right after the homepage
    pub static_pages: Vec<String>,
    /// Site-relative bundle path copied to `favicon.ico` at the output root
    pub favicon: Option<String>,
    /// How many pages may be rendered at once (1 = strictly sequential)
    pub jobs: usize,
    /// Per-request timeout for the HTTP backend
    pub request_timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            static_pages: vec![
                "/about".to_string(),
                "/license-policy".to_string(),
                "/search-help".to_string(),
            ],
            favicon: Some("static/shared/icon/favicon.ico".to_string()),
            jobs: 1,
            request_timeout_secs: 30,
        }
    }
}

impl ExportConfig {
    // Reads a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: ExportConfig = serde_json::from_str(raw)?;
        // A zero here would stall the page stream forever
        config.jobs = config.jobs.max(1);
        Ok(config)
    }
}
