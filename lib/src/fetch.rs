//! Retrieval of compatibility pages from the documentation host.
//!
//! One page per version token, fetched with a single best-effort GET:
//! no retries, no caching. The upstream markup is unversioned, so the
//! extractor downstream is the only compatibility layer against drift.

use std::time::Duration;

use tracing::{Span, debug, instrument, warn};
use url::Url;

use crate::error::{FetchError, Result};
use crate::version::VersionToken;

/// Base URL of the documentation host. Relative links scraped out of
/// the pages are absolutized against this host.
pub const DOCS_HOST: &str = "https://learn.microsoft.com";

/// Path of the per-version compatibility page, relative to the base
/// URL so that a mirror with a path prefix keeps it.
const COMPAT_PATH: &str = "en-us/dotnet/core/compatibility/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pooled HTTP client bound to a documentation host.
///
/// The base URL is overridable for tests and mirrors; link
/// absolutization always uses [`DOCS_HOST`] regardless.
#[derive(Debug, Clone)]
pub struct DocsClient {
    client: reqwest::Client,
    base: Url,
}

impl DocsClient {
    /// Client against the live documentation host.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_base(Url::parse(DOCS_HOST)?)
    }

    /// Client against an alternate host serving the same page layout.
    ///
    /// A path prefix on the base URL (e.g. a mirror under `/docs/`)
    /// is preserved when page URLs are built.
    pub fn with_base(mut base: Url) -> Result<Self> {
        // Page paths join relative to the base; without the trailing
        // slash Url::join would drop the last path segment.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, base })
    }

    /// The base URL this client fetches from.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of the compatibility page for one version token.
    ///
    /// Carries the `toc`/`bc` query parameters the docs site expects
    /// when a page is addressed directly.
    pub fn page_url(&self, version: VersionToken) -> Result<Url> {
        let mut url = self.base.join(&format!("{COMPAT_PATH}{version}"))?;
        url.query_pairs_mut()
            .append_pair("toc", "/dotnet/fundamentals/toc.json")
            .append_pair("bc", "/dotnet/breadcrumb/toc.json");
        Ok(url)
    }

    /// Fetches the raw markup of one compatibility page.
    ///
    /// ## Errors
    ///
    /// Any transport failure or non-success HTTP status is an error;
    /// there is no retry and no partial body.
    #[instrument(
        name = "fetch_page",
        skip(self),
        fields(
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    pub async fn fetch_page(&self, version: VersionToken) -> Result<String> {
        let url = self.page_url(version)?;
        Span::current().record("http.url", url.as_str());
        debug!(%version, "fetching compatibility page");

        let response = self.client.get(url.clone()).send().await.map_err(|source| {
            warn!(error = %source, "compatibility page request failed");
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            warn!(
                http.status_code = status.as_u16(),
                "documentation host returned an error status"
            );
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        debug!(content_length = body.len(), "retrieved compatibility page");

        Ok(body)
    }
}
