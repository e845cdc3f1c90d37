// src/crawl/render.rs
// =============================================================================
// Renders one page through a Router, following redirects.
//
// How it works:
// 1. GET the path
// 2. If the answer is 301/302 with a Location header, GET that location
// 3. Give up after MAX_REDIRECTS hops (catches redirect loops)
// 4. Anything other than a final 200 is an error for this page
//
// The rendered page keeps the path that was originally requested: the
// content of the redirect target is written where the original page lives.
// =============================================================================

use super::router::Router;
use crate::config::MAX_REDIRECTS;
use crate::error::ExportError;
use reqwest::{Method, StatusCode};
use url::Url;

// One successfully rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The path that was requested (decides where the page is written)
    pub url_path: String,
    /// Where the redirect chain ended (equal to url_path without redirects)
    pub final_path: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub status: StatusCode,
}

impl RenderedPage {
    // The backend leaves Content-Type empty for some HTML pages, so an empty
    // type counts as HTML too
    pub fn is_html(&self) -> bool {
        self.content_type.is_empty() || self.content_type.contains("text/html")
    }
}

// Renders `url_path`, following at most MAX_REDIRECTS redirects
pub async fn render<R: Router>(
    router: &R,
    url_path: &str,
) -> Result<RenderedPage, ExportError> {
    let mut current = url_path.to_string();
    let mut hops = 0;

    loop {
        let response = router.serve(&Method::GET, &current).await?;

        if matches!(
            response.status,
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND
        ) {
            if let Some(location) = response.location.as_deref().filter(|l| !l.is_empty()) {
                hops += 1;
                if hops > MAX_REDIRECTS {
                    return Err(ExportError::TooManyRedirects {
                        path: url_path.to_string(),
                        limit: MAX_REDIRECTS,
                    });
                }

                tracing::debug!(from = %current, to = %location, hop = hops, "following redirect");
                current = resolve_location(&current, location).ok_or_else(|| {
                    ExportError::OffSiteRedirect {
                        path: url_path.to_string(),
                        location: location.to_string(),
                    }
                })?;
                continue;
            }
        }

        if response.status != StatusCode::OK {
            return Err(ExportError::UnexpectedStatus {
                path: current,
                status: response.status,
            });
        }

        return Ok(RenderedPage {
            url_path: url_path.to_string(),
            final_path: current,
            body: response.body,
            content_type: response.content_type.unwrap_or_default(),
            status: response.status,
        });
    }
}

// Resolves a Location header against the page that sent it
//
// Returns None when the location leaves the site (another scheme or host).
//
// Examples (current = "/net/http"):
//   "/about"              -> Some("/about")
//   "httptest"            -> Some("/net/httptest")
//   "//example.com/x"     -> None
//   "https://example.com" -> None
fn resolve_location(current: &str, location: &str) -> Option<String> {
    // Any fixed origin works; it only anchors relative resolution
    let site = Url::parse("http://site.invalid/").ok()?;
    let from = site.join(current).ok()?;
    let target = from.join(location).ok()?;

    if target.origin() != site.origin() {
        return None;
    }

    let mut path = target.path().to_string();
    if let Some(query) = target.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(path)
}
