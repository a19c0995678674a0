//! Adapters between Roundtrip's core and the outside world.
//!
//! - [`geocoding`] resolves addresses through a Nominatim-compatible HTTP
//!   service.
//! - [`store`] loads location records from JSON and persists the
//!   coordinate-annotated copy.

#![forbid(unsafe_code)]

pub mod geocoding;
pub mod store;
