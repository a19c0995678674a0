//! Resolve free-text addresses to coordinates.
//!
//! The [`GeoCoder`] trait abstracts the external lookup service. Calls are
//! independent and may fail one at a time: [`enrich_locations`] collects
//! per-location [`GeocodeFailure`]s instead of aborting the batch, unless the
//! caller asks for [`UnresolvedPolicy::Abort`].
//!
//! [`RetryingGeoCoder`] layers an injectable [`RetryPolicy`] over any coder
//! so transient network failures do not leak into the core pipeline.

mod coder;
mod enrich;
mod error;
mod retry;

pub use coder::{GeoCoder, GeocodeOutcome, GeocodeRequest};
pub use enrich::{EnrichError, GeocodeFailure, GeocodeReport, UnresolvedPolicy, enrich_locations};
pub use error::GeocodeError;
pub use retry::{RetryPolicy, RetryingGeoCoder};
