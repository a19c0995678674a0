//! Geocoder construction shared by the `geocode` and `solve` commands.

use std::time::Duration;

use roundtrip_core::{GeoCoder, RetryPolicy, RetryingGeoCoder};
use roundtrip_data::geocoding::{HttpGeoCoderConfig, NominatimGeoCoder};

use crate::CliError;

/// Pause between request starts unless configured otherwise. Nominatim's
/// public usage policy allows one request per second.
pub(crate) const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

/// Resolved geocoder options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocoderSettings {
    pub(crate) http: HttpGeoCoderConfig,
    pub(crate) retry: RetryPolicy,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            http: HttpGeoCoderConfig::default()
                .with_min_interval(Duration::from_millis(DEFAULT_MIN_INTERVAL_MS)),
            retry: RetryPolicy::default(),
        }
    }
}

/// Optional overrides as they arrive from merged arguments.
#[derive(Debug, Clone, Default)]
pub(crate) struct GeocoderOverrides {
    pub(crate) base_url: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) concurrency: Option<usize>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) min_interval_ms: Option<u64>,
    pub(crate) max_attempts: Option<u32>,
}

impl From<GeocoderOverrides> for GeocoderSettings {
    fn from(overrides: GeocoderOverrides) -> Self {
        let defaults = Self::default();
        let mut http = defaults.http;
        if let Some(base_url) = overrides.base_url {
            http.base_url = base_url;
        }
        if let Some(user_agent) = overrides.user_agent {
            http.user_agent = user_agent;
        }
        if let Some(concurrency) = overrides.concurrency {
            http.concurrency = concurrency.max(1);
        }
        if let Some(secs) = overrides.timeout_secs {
            http.timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = overrides.min_interval_ms {
            http.min_interval = (millis > 0).then(|| Duration::from_millis(millis));
        }
        let retry = overrides
            .max_attempts
            .map_or(defaults.retry, |attempts| {
                defaults.retry.with_max_attempts(attempts)
            });
        Self { http, retry }
    }
}

/// Builds a geocoder for the current invocation.
pub(crate) trait GeoCoderBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Box<dyn GeoCoder>, CliError>;
}

/// Builds a retrying [`NominatimGeoCoder`].
pub(crate) struct NominatimGeoCoderBuilder;

impl GeoCoderBuilder for NominatimGeoCoderBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Box<dyn GeoCoder>, CliError> {
        let coder = NominatimGeoCoder::with_config(settings.http.clone()).map_err(|source| {
            CliError::BuildGeoCoder {
                base_url: settings.http.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(RetryingGeoCoder::new(coder, settings.retry)))
    }
}
