//! HTTP geocoding against Nominatim-compatible services.
//!
//! [`NominatimGeoCoder`] implements [`roundtrip_core::GeoCoder`] by calling
//! the `/search` endpoint and taking the first hit. The core trait is
//! synchronous, so the coder blocks on a Tokio runtime internally; batches
//! passed to `resolve_many` run with bounded concurrency.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use roundtrip_core::GeoCoder;
//! use roundtrip_data::geocoding::{HttpGeoCoderConfig, NominatimGeoCoder};
//!
//! let config = HttpGeoCoderConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-tour-planner/1.0")
//!     .with_min_interval(Duration::from_secs(1));
//! let coder = NominatimGeoCoder::with_config(config)?;
//!
//! let capitol = coder.resolve("1007 E Grand Ave, Des Moines, 50319")?;
//! println!("{}, {}", capitol.y, capitol.x);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

pub use provider::{
    DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, HttpGeoCoderConfig, NominatimGeoCoder,
    ProviderBuildError,
};
