use thiserror::Error;

/// Errors from [`crate::GeoCoder::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query was blank, so no lookup was attempted.
    #[error("address is empty")]
    EmptyAddress,
    /// The service returned no match for the address.
    #[error("no match found for address {address:?}")]
    NotFound {
        /// The query that produced no match.
        address: String,
    },
    /// The request failed before a response arrived.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service asked the client to slow down (HTTP 429).
    #[error("geocoding service at {url} is rate limiting requests")]
    RateLimited {
        /// Request URL.
        url: String,
    },
    /// The service answered with a non-success status.
    #[error("geocoding service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be interpreted.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Parser error description.
        message: String,
    },
}

impl GeocodeError {
    /// Whether repeating the same request may succeed.
    ///
    /// Network failures, timeouts, rate limiting and 5xx responses are
    /// transient. A missing match or a malformed response is not.
    ///
    /// # Examples
    /// ```
    /// use roundtrip_core::GeocodeError;
    ///
    /// let busy = GeocodeError::RateLimited { url: "http://geo".into() };
    /// let missing = GeocodeError::NotFound { address: "nowhere".into() };
    /// assert!(busy.is_retryable());
    /// assert!(!missing.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::EmptyAddress | Self::NotFound { .. } | Self::Parse { .. } => false,
        }
    }
}
