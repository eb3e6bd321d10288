/// Errors raised while talking to the documentation host.
///
/// Extraction itself never fails: malformed rows are skipped and
/// missing category signals fall back locally. Only the network side
/// of the pipeline can surface an error.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The request never produced a response (DNS, connect, timeout,
    /// body read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The host answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The configured documentation base URL cannot address a page.
    #[error("invalid documentation URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience Result type for leapfrog operations.
pub type Result<T> = std::result::Result<T, FetchError>;
