//! Core domain types for the Roundtrip tour planner.
//!
//! The crate owns everything that does not touch the network or the
//! filesystem: location records, great-circle distances, the integer
//! distance matrix, closed routes, the [`TourSolver`] and [`GeoCoder`]
//! boundaries, and the planning pipeline that ties them together.
//!
//! Adapters that talk to external services (HTTP geocoding, JSON files,
//! third-party solvers) live in sibling crates and plug in through the
//! traits defined here.

#![forbid(unsafe_code)]

pub mod distance;
pub mod geocode;
mod location;
mod plan;
pub mod report;
mod route;
mod solver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use distance::{
    DEFAULT_SCALE, DistanceMatrix, DistanceMatrixBuilder, EARTH_RADIUS_KM, MatrixError,
    haversine_km,
};
pub use geocode::{
    EnrichError, GeoCoder, GeocodeError, GeocodeFailure, GeocodeOutcome, GeocodeReport,
    GeocodeRequest, RetryPolicy, RetryingGeoCoder, UnresolvedPolicy, enrich_locations,
};
pub use location::{Location, LocationError};
pub use plan::{PlanError, Stop, TourPlan, plan_tour};
pub use route::{Route, RouteError};
pub use solver::{SolveError, TourSolver, validate_start};
