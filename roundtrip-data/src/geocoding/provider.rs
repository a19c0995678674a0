//! Nominatim-backed [`GeoCoder`] over HTTP.
//!
//! [`GeoCoder`] is synchronous so the core stays embeddable in plain
//! programs. [`NominatimGeoCoder`] bridges to async `reqwest` calls by
//! blocking on a Tokio runtime it owns, or on the caller's multi-threaded
//! runtime when there is one.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use futures_util::{StreamExt, stream};
use geo::Coord;
use reqwest::{Client, StatusCode};
use roundtrip_core::{GeoCoder, GeocodeError, GeocodeOutcome, GeocodeRequest};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use super::nominatim::{SearchHit, first_match};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
///
/// Nominatim's usage policy rejects requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "roundtrip-geocoder/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for [`NominatimGeoCoder`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL does not parse.
    #[error("invalid geocoder base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`NominatimGeoCoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGeoCoderConfig {
    /// Base URL of the service, without the `/search` suffix.
    pub base_url: String,
    /// Request timeout, also used as the connect timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of requests in flight during a batch.
    ///
    /// Values below one are treated as one.
    pub concurrency: usize,
    /// Minimum spacing between the start of consecutive requests.
    pub min_interval: Option<Duration>,
}

impl Default for HttpGeoCoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            concurrency: 1,
            min_interval: None,
        }
    }
}

impl HttpGeoCoderConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set how many batch requests may be in flight at once.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Require at least `interval` between request starts.
    #[must_use]
    pub const fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }
}

/// Geocoder for the Nominatim `/search` API.
///
/// Each lookup requests `{base_url}/search?q=<address>&format=json&limit=1`
/// and takes the first hit. An empty result array is reported as
/// [`GeocodeError::NotFound`] and HTTP 429 as [`GeocodeError::RateLimited`].
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the coder blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime (detected with
/// [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]) it uses that
/// runtime's handle under [`tokio::task::block_in_place`]. Calling it from a
/// `current_thread` runtime is not supported: Tokio refuses to block on a
/// runtime from within another one.
pub struct NominatimGeoCoder {
    client: Client,
    config: HttpGeoCoderConfig,
    search_url: Url,
    runtime: Runtime,
    last_request: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for NominatimGeoCoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeoCoder")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl NominatimGeoCoder {
    /// Create a coder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpGeoCoderConfig::new(base_url))
    }

    /// Create a coder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpGeoCoderConfig) -> Result<Self, ProviderBuildError> {
        let search_url = Url::parse(&format!(
            "{}/search",
            config.base_url.trim_end_matches('/')
        ))
        .map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            search_url,
            runtime,
            last_request: Mutex::new(None),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpGeoCoderConfig {
        &self.config
    }

    /// Build the search URL for one address.
    fn build_search_url(&self, address: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    /// Wait until the configured interval since the previous request start
    /// has elapsed.
    async fn pace(&self) {
        let Some(interval) = self.config.min_interval else {
            return;
        };
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + interval).await;
        }
        *last = Some(Instant::now());
    }

    /// Resolve one address asynchronously.
    async fn resolve_async(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let url = self.build_search_url(query);
        self.pace().await;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited {
                url: url.to_string(),
            });
        }
        let success = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        let hits: Vec<SearchHit> = success
            .json()
            .await
            .map_err(|err| GeocodeError::Parse {
                message: err.to_string(),
            })?;
        first_match(&hits, query)
    }

    /// Resolve a batch with at most `concurrency` requests in flight.
    async fn resolve_batch(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        let mut by_id: HashMap<&str, Result<Coord<f64>, GeocodeError>> =
            stream::iter(requests)
                .map(|request| async move {
                    (request.id.as_str(), self.resolve_async(&request.query).await)
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

        requests
            .iter()
            .map(|request| GeocodeOutcome {
                id: request.id.clone(),
                result: by_id.remove(request.id.as_str()).unwrap_or_else(|| {
                    Err(GeocodeError::NotFound {
                        address: request.query.clone(),
                    })
                }),
            })
            .collect()
    }

    /// Convert a reqwest error to a `GeocodeError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        GeocodeError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl GeoCoder for NominatimGeoCoder {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        self.block_on(self.resolve_async(address))
    }

    /// Resolve a batch concurrently.
    ///
    /// Outcomes are matched to requests by identifier, so identifiers must
    /// be unique within a batch; a repeated identifier only keeps one
    /// answer and later duplicates report `NotFound`.
    fn resolve_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        if requests.is_empty() {
            return Vec::new();
        }
        log::debug!(
            "geocoding {} addresses with up to {} in flight",
            requests.len(),
            self.config.concurrency.max(1)
        );
        self.block_on(self.resolve_batch(requests))
    }
}
