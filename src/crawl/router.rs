// src/crawl/router.rs
// =============================================================================
// Rendering backends.
//
// The crawler never renders pages itself. It asks a Router for the response
// to "GET <path>" and only looks at the status, Content-Type, Location and
// body. Two backends are provided:
//
// - HttpRouter: talks to a running instance of the site over HTTP
// - MemoryRouter: an in-process route table (tests, embedding)
//
// Redirects are NOT followed by the backends; the crawler follows them so it
// can enforce its own hop limit and keep the original output path.
// =============================================================================

use crate::error::ExportError;
use anyhow::{anyhow, Result};
use reqwest::header::{HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client, Method, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

// What a backend hands back for one request
#[derive(Debug, Clone)]
pub struct RouterResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl RouterResponse {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some(content_type.to_string()),
            location: None,
            body: body.into(),
        }
    }

    pub fn redirect(status: StatusCode, location: &str) -> Self {
        Self {
            status,
            content_type: None,
            location: Some(location.to_string()),
            body: Vec::new(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            location: None,
            body: Vec::new(),
        }
    }
}

// The request/response contract the crawler depends on
//
// `url_path` is a site path such as "/net/http" (it may carry a query string
// when a redirect added one).
#[allow(async_fn_in_trait)]
pub trait Router {
    async fn serve(&self, method: &Method, url_path: &str) -> Result<RouterResponse, ExportError>;
}

// -----------------------------------------------------------------------------
// HttpRouter
// -----------------------------------------------------------------------------

// Fetches pages from a running site, e.g. http://localhost:8080/
pub struct HttpRouter {
    client: Client,
    base: Url,
}

impl HttpRouter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", base_url, e))?;

        if base.cannot_be_a_base() {
            return Err(anyhow!("Base URL cannot hold paths: {}", base_url));
        }

        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { client, base })
    }

    // Absolute URL for a site path
    fn url_for(&self, url_path: &str) -> Result<Url, url::ParseError> {
        self.base.join(url_path.trim_start_matches('/'))
    }

    // Maps a Location header back to a site path when it points inside the
    // site. Anything else is returned untouched, which the crawler reports as
    // an off-site redirect.
    fn site_path(&self, request_url: &Url, location: &str) -> String {
        let target = match request_url.join(location) {
            Ok(url) => url,
            Err(_) => return location.to_string(),
        };

        let same_origin = target.origin() == self.base.origin();
        // "/docs" is the site root just like "/docs/"
        let rest = if target.path() == self.base.path().trim_end_matches('/') {
            Some("")
        } else {
            target.path().strip_prefix(self.base.path())
        };
        match rest {
            Some(rest) if same_origin => {
                let mut path = format!("/{}", rest);
                if let Some(query) = target.query() {
                    path.push('?');
                    path.push_str(query);
                }
                path
            }
            _ => target.to_string(),
        }
    }
}

impl Router for HttpRouter {
    async fn serve(&self, method: &Method, url_path: &str) -> Result<RouterResponse, ExportError> {
        let backend_err = |reason: String| ExportError::Backend {
            path: url_path.to_string(),
            reason,
        };

        let url = self.url_for(url_path).map_err(|e| backend_err(e.to_string()))?;

        let response = self
            .client
            .request(method.clone(), url.clone())
            .send()
            .await
            .map_err(|e| backend_err(e.to_string()))?;

        let status = response.status();
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let location = header(LOCATION).map(|loc| self.site_path(&url, &loc));

        let body = response
            .bytes()
            .await
            .map_err(|e| backend_err(e.to_string()))?
            .to_vec();

        Ok(RouterResponse {
            status,
            content_type,
            location,
            body,
        })
    }
}

// -----------------------------------------------------------------------------
// MemoryRouter
// -----------------------------------------------------------------------------

// A fixed route table. Unknown paths answer 404.
#[derive(Debug, Default, Clone)]
pub struct MemoryRouter {
    routes: HashMap<String, RouterResponse>,
}

impl MemoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url_path: &str, response: RouterResponse) -> Self {
        self.routes.insert(url_path.to_string(), response);
        self
    }

    pub fn page(self, url_path: &str, html: &str) -> Self {
        self.route(url_path, RouterResponse::ok("text/html; charset=utf-8", html))
    }
}

impl Router for MemoryRouter {
    async fn serve(&self, method: &Method, url_path: &str) -> Result<RouterResponse, ExportError> {
        if *method != Method::GET {
            return Ok(RouterResponse::status(StatusCode::METHOD_NOT_ALLOWED));
        }

        Ok(self
            .routes
            .get(url_path)
            .cloned()
            .unwrap_or_else(|| RouterResponse::status(StatusCode::NOT_FOUND)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(base: &str) -> HttpRouter {
        HttpRouter::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let r = router("http://localhost:8080/docs");
        assert_eq!(
            r.url_for("/net/http").unwrap().as_str(),
            "http://localhost:8080/docs/net/http"
        );
        assert_eq!(r.url_for("/").unwrap().as_str(), "http://localhost:8080/docs/");
    }

    #[test]
    fn test_site_path_maps_same_origin_locations() {
        let r = router("http://localhost:8080/");
        let req = r.url_for("/old").unwrap();

        assert_eq!(r.site_path(&req, "/new"), "/new");
        assert_eq!(r.site_path(&req, "http://localhost:8080/new?tab=doc"), "/new?tab=doc");
        assert_eq!(r.site_path(&req, "https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn test_site_path_maps_base_without_trailing_slash_to_root() {
        let r = router("http://localhost:8080/docs/");
        let req = r.url_for("/").unwrap();

        assert_eq!(r.site_path(&req, "/docs"), "/");
        assert_eq!(r.site_path(&req, "/docs/"), "/");
        assert_eq!(r.site_path(&req, "/docs/net/http"), "/net/http");
        assert_eq!(r.site_path(&req, "/docsx"), "http://localhost:8080/docsx");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpRouter::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpRouter::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_memory_router_answers_404_for_unknown_paths() {
        let r = MemoryRouter::new().page("/", "<html></html>");

        let home = r.serve(&Method::GET, "/").await.unwrap();
        assert_eq!(home.status, StatusCode::OK);

        let missing = r.serve(&Method::GET, "/nope").await.unwrap();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
