//! Attach coordinates to a batch of locations.

use std::collections::{HashMap, HashSet};

use geo::Coord;
use thiserror::Error;

use crate::Location;
use crate::location::valid_coordinate;

use super::{GeoCoder, GeocodeError, GeocodeRequest};

/// What to do when an address cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Record the failure and leave the location out of the tour.
    #[default]
    Skip,
    /// Fail the whole batch on the first unresolved address.
    Abort,
}

/// A location whose address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeFailure {
    /// Name of the location.
    pub name: String,
    /// Query sent to the geocoder.
    pub query: String,
    /// Why resolution failed.
    pub error: GeocodeError,
}

/// Outcome of [`enrich_locations`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodeReport {
    /// Every input location in input order, with coordinates attached where
    /// resolution succeeded.
    pub locations: Vec<Location>,
    /// Locations that remain without coordinates.
    pub failures: Vec<GeocodeFailure>,
    /// Number of locations that already carried coordinates.
    pub cached: usize,
    /// Number of locations resolved during this call.
    pub resolved: usize,
}

impl GeocodeReport {
    /// Locations with coordinates, in input order.
    pub fn geocoded(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|location| location.is_geocoded())
    }

    /// Consume the report, keeping only locations with coordinates.
    #[must_use]
    pub fn into_geocoded(self) -> Vec<Location> {
        self.locations
            .into_iter()
            .filter(Location::is_geocoded)
            .collect()
    }

    /// Whether every location now has coordinates.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Errors from [`enrich_locations`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    /// Two input records share a name, so outcomes cannot be matched back.
    #[error("location name {name:?} appears more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// An address could not be resolved under [`UnresolvedPolicy::Abort`].
    #[error("failed to geocode {name:?}: {source}")]
    Unresolved {
        /// Name of the location.
        name: String,
        /// The geocoding failure.
        #[source]
        source: GeocodeError,
    },
}

/// Attach coordinates to every location that lacks them.
///
/// Locations that already carry coordinates are kept as they are and count
/// as cached. The rest are resolved through `coder` using
/// [`Location::geocode_query`]; outcomes are matched back by location name.
/// Blank queries fail with [`GeocodeError::EmptyAddress`] without calling
/// the coder, and resolved coordinates outside the WGS84 range are treated
/// as parse failures.
///
/// # Errors
///
/// Returns [`EnrichError::DuplicateName`] when names are not unique, and
/// [`EnrichError::Unresolved`] for the first failure (in input order) when
/// `policy` is [`UnresolvedPolicy::Abort`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roundtrip_core::{GeoCoder, GeocodeError, Location, UnresolvedPolicy, enrich_locations};
///
/// struct MainStreetOnly;
///
/// impl GeoCoder for MainStreetOnly {
///     fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
///         match address {
///             "1 Main St, 50319" => Ok(Coord { x: -93.6, y: 41.6 }),
///             other => Err(GeocodeError::NotFound { address: other.to_owned() }),
///         }
///     }
/// }
///
/// let report = enrich_locations(
///     &MainStreetOnly,
///     vec![
///         Location::new("Iowa", "1 Main St", "50319"),
///         Location::new("Atlantis", "Under the sea", ""),
///     ],
///     UnresolvedPolicy::Skip,
/// )?;
///
/// assert_eq!(report.resolved, 1);
/// assert_eq!(report.failures.len(), 1);
/// assert_eq!(report.geocoded().count(), 1);
/// # Ok::<(), roundtrip_core::EnrichError>(())
/// ```
pub fn enrich_locations<G>(
    coder: &G,
    locations: Vec<Location>,
    policy: UnresolvedPolicy,
) -> Result<GeocodeReport, EnrichError>
where
    G: GeoCoder + ?Sized,
{
    ensure_unique_names(&locations)?;

    let requests: Vec<GeocodeRequest> = locations
        .iter()
        .filter(|location| !location.is_geocoded())
        .map(|location| GeocodeRequest::new(location.name.clone(), location.geocode_query()))
        .collect();
    let lookups: Vec<GeocodeRequest> = requests
        .iter()
        .filter(|request| !request.query.is_empty())
        .cloned()
        .collect();

    let mut outcomes: HashMap<String, Result<Coord<f64>, GeocodeError>> = if lookups.is_empty() {
        HashMap::new()
    } else {
        coder
            .resolve_many(&lookups)
            .into_iter()
            .map(|outcome| (outcome.id, outcome.result))
            .collect()
    };

    let mut report = GeocodeReport {
        locations: Vec::with_capacity(locations.len()),
        ..GeocodeReport::default()
    };
    for location in locations {
        if location.is_geocoded() {
            report.cached += 1;
            report.locations.push(location);
            continue;
        }
        let query = location.geocode_query();
        let result = if query.is_empty() {
            Err(GeocodeError::EmptyAddress)
        } else {
            outcomes
                .remove(&location.name)
                .unwrap_or_else(|| {
                    Err(GeocodeError::NotFound {
                        address: query.clone(),
                    })
                })
                .and_then(check_range)
        };
        match result {
            Ok(coordinates) => {
                report.resolved += 1;
                report.locations.push(location.with_coordinates(coordinates));
            }
            Err(error) => {
                log::warn!("could not geocode {:?} ({query:?}): {error}", location.name);
                if policy == UnresolvedPolicy::Abort {
                    return Err(EnrichError::Unresolved {
                        name: location.name,
                        source: error,
                    });
                }
                report.failures.push(GeocodeFailure {
                    name: location.name.clone(),
                    query,
                    error,
                });
                report.locations.push(location);
            }
        }
    }

    log::info!(
        "geocoding finished: {} cached, {} resolved, {} failed",
        report.cached,
        report.resolved,
        report.failures.len()
    );
    Ok(report)
}

fn ensure_unique_names(locations: &[Location]) -> Result<(), EnrichError> {
    let mut seen = HashSet::with_capacity(locations.len());
    for location in locations {
        if !seen.insert(location.name.as_str()) {
            return Err(EnrichError::DuplicateName {
                name: location.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_range(coord: Coord<f64>) -> Result<Coord<f64>, GeocodeError> {
    if valid_coordinate(coord.y, coord.x) {
        Ok(coord)
    } else {
        Err(GeocodeError::Parse {
            message: format!("coordinates ({}, {}) are out of range", coord.y, coord.x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeoCoder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn coder() -> StubGeoCoder {
        StubGeoCoder::default()
            .with_match("1007 E Grand Ave, 50319", 41.5911, -93.6037)
            .with_match("401 S 2nd St, 62701", 39.7983, -89.6544)
    }

    #[fixture]
    fn records() -> Vec<Location> {
        vec![
            Location::new("Iowa", "1007 E Grand Ave", "50319"),
            Location::new("Kansas", "300 SW 10th Ave", "66612"),
            Location::new("Illinois", "401 S 2nd St", "62701"),
        ]
    }

    #[rstest]
    fn keeps_input_order_and_reports_failures(coder: StubGeoCoder, records: Vec<Location>) {
        let report =
            enrich_locations(&coder, records, UnresolvedPolicy::Skip).expect("skip policy");

        let names: Vec<&str> = report.locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Iowa", "Kansas", "Illinois"]);
        assert_eq!(report.resolved, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "Kansas");
        assert_eq!(report.failures[0].query, "300 SW 10th Ave, 66612");
        assert!(matches!(
            report.failures[0].error,
            GeocodeError::NotFound { .. }
        ));
        let geocoded: Vec<&str> = report.geocoded().map(|l| l.name.as_str()).collect();
        assert_eq!(geocoded, ["Iowa", "Illinois"]);
        assert!(!report.is_complete());
    }

    #[rstest]
    fn abort_policy_stops_on_first_failure(coder: StubGeoCoder, records: Vec<Location>) {
        let err = enrich_locations(&coder, records, UnresolvedPolicy::Abort)
            .expect_err("Kansas is unknown");
        match err {
            EnrichError::Unresolved { name, .. } => assert_eq!(name, "Kansas"),
            other => panic!("expected Unresolved, got {other:?}"),
        }
    }

    #[rstest]
    fn cached_coordinates_skip_the_coder(coder: StubGeoCoder) {
        let records = vec![
            Location::at("Iowa", 41.0, -93.0),
            Location::new("Illinois", "401 S 2nd St", "62701"),
        ];

        let report = enrich_locations(&coder, records, UnresolvedPolicy::Abort).expect("resolved");

        assert_eq!(report.cached, 1);
        assert_eq!(report.resolved, 1);
        assert_eq!(coder.calls(), 1);
        assert_eq!(report.locations[0].latitude(), Some(41.0));
    }

    #[rstest]
    fn blank_address_fails_without_lookup(coder: StubGeoCoder) {
        let report = enrich_locations(
            &coder,
            vec![Location::new("Nowhere", " ", "")],
            UnresolvedPolicy::Skip,
        )
        .expect("skip policy");

        assert_eq!(coder.calls(), 0);
        assert_eq!(report.failures[0].error, GeocodeError::EmptyAddress);
    }

    #[rstest]
    fn out_of_range_results_are_rejected() {
        let coder = StubGeoCoder::default().with_match("bad", 123.0, 0.0);
        let report = enrich_locations(
            &coder,
            vec![Location::new("Bad", "bad", "")],
            UnresolvedPolicy::Skip,
        )
        .expect("skip policy");

        assert!(matches!(
            report.failures[0].error,
            GeocodeError::Parse { .. }
        ));
    }

    #[rstest]
    fn duplicate_names_are_rejected(coder: StubGeoCoder) {
        let records = vec![
            Location::new("Iowa", "a", ""),
            Location::new("Iowa", "b", ""),
        ];
        let err = enrich_locations(&coder, records, UnresolvedPolicy::Skip).expect_err("dup");
        assert_eq!(
            err,
            EnrichError::DuplicateName {
                name: "Iowa".to_owned()
            }
        );
    }
}
