//! Facade crate for the Roundtrip tour planner.
//!
//! This crate re-exports the core domain types and exposes the bundled tour
//! solvers behind feature flags.
//!
//! ```
//! # #[cfg(feature = "solver-insertion")]
//! # {
//! use roundtrip::{DistanceMatrixBuilder, InsertionSolver, Location, plan_tour};
//!
//! let corners = vec![
//!     Location::at("A", 0.0, 0.0),
//!     Location::at("B", 0.0, 1.0),
//!     Location::at("C", 1.0, 1.0),
//!     Location::at("D", 1.0, 0.0),
//! ];
//! let plan = plan_tour(&corners, "A", &InsertionSolver::new(), &DistanceMatrixBuilder::new())?;
//! assert_eq!(plan.stops.len(), 5);
//! # }
//! # Ok::<(), roundtrip::PlanError>(())
//! ```

#![forbid(unsafe_code)]

pub use roundtrip_core::report;
pub use roundtrip_core::{
    DEFAULT_SCALE, DistanceMatrix, DistanceMatrixBuilder, EARTH_RADIUS_KM, EnrichError, GeoCoder,
    GeocodeError, GeocodeFailure, GeocodeOutcome, GeocodeReport, GeocodeRequest, Location,
    LocationError, MatrixError, PlanError, RetryPolicy, RetryingGeoCoder, Route, RouteError,
    SolveError, Stop, TourPlan, TourSolver, UnresolvedPolicy, enrich_locations, haversine_km,
    plan_tour, validate_start,
};

#[cfg(feature = "solver-insertion")]
pub use roundtrip_solver_insertion::{InsertionSolver, InsertionSolverConfig};

#[cfg(feature = "solver-vrp")]
pub use roundtrip_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};
