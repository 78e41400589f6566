//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the track catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Client id or secret missing
    #[error("Catalog credentials are not configured")]
    NotConfigured,

    /// Rejected before any request was made
    #[error("Invalid catalog query: {0}")]
    InvalidQuery(String),

    /// Catalog responded 404
    #[error("Track not found: {0}")]
    NotFound(String),

    /// Catalog responded with a non-success status, or the credential
    /// exchange failed
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Catalog request timed out")]
    Timeout,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid base or token URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CatalogError {
    /// Whether the failure is on the catalog side (maps to 503 upstream)
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured | Self::Unavailable(_) | Self::Timeout | Self::Request(_)
        )
    }
}

/// Classify a failure while reading or decoding a response body.
///
/// `reqwest`'s timeout also covers the body, so a provider that sends
/// headers and then stalls surfaces here rather than at `send()`.
pub(crate) fn body_error(e: reqwest::Error, what: &str) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else if e.is_decode() {
        CatalogError::ParseError(format!("Failed to parse {what}: {e}"))
    } else {
        CatalogError::Request(e)
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
