//! Geocoder trait and batch request types.

use geo::Coord;

use super::GeocodeError;

/// One address to resolve, tagged with the caller's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    /// Identifier used to match the outcome back to its record.
    pub id: String,
    /// Free-text address query.
    pub query: String,
}

impl GeocodeRequest {
    /// Create a request.
    #[must_use]
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
        }
    }
}

/// Result of resolving one [`GeocodeRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeOutcome {
    /// Identifier copied from the request.
    pub id: String,
    /// Resolved coordinates (`x = longitude`, `y = latitude`) or the failure.
    pub result: Result<Coord<f64>, GeocodeError>,
}

/// Resolve addresses to WGS84 coordinates.
///
/// Each call is independent and may fail on its own; callers treat a failure
/// as affecting only the address in question.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use roundtrip_core::{GeoCoder, GeocodeError, GeocodeRequest};
///
/// struct NullIsland;
///
/// impl GeoCoder for NullIsland {
///     fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
///         if address.is_empty() {
///             return Err(GeocodeError::EmptyAddress);
///         }
///         Ok(Coord { x: 0.0, y: 0.0 })
///     }
/// }
///
/// let outcomes = NullIsland.resolve_many(&[
///     GeocodeRequest::new("a", "somewhere"),
///     GeocodeRequest::new("b", ""),
/// ]);
/// assert!(outcomes[0].result.is_ok());
/// assert_eq!(outcomes[1].result, Err(GeocodeError::EmptyAddress));
/// ```
pub trait GeoCoder {
    /// Resolve one address.
    ///
    /// Implementations return `Err(GeocodeError::NotFound { .. })` when the
    /// service has no match.
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError>;

    /// Resolve a batch of requests.
    ///
    /// Outcomes are returned in request order, each carrying the request's
    /// identifier. Implementations may issue requests concurrently but must
    /// reassemble results by identifier rather than arrival order. The default
    /// implementation resolves sequentially.
    fn resolve_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        requests
            .iter()
            .map(|request| GeocodeOutcome {
                id: request.id.clone(),
                result: self.resolve(&request.query),
            })
            .collect()
    }
}

impl<T: GeoCoder + ?Sized> GeoCoder for &T {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        (**self).resolve(address)
    }

    fn resolve_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        (**self).resolve_many(requests)
    }
}

impl<T: GeoCoder + ?Sized> GeoCoder for Box<T> {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        (**self).resolve(address)
    }

    fn resolve_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        (**self).resolve_many(requests)
    }
}
