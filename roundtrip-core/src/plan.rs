//! The planning pipeline: locations in, ordered tour out.

use std::fmt;

use thiserror::Error;

use crate::{
    DistanceMatrixBuilder, Location, MatrixError, Route, RouteError, SolveError, TourSolver,
};

/// One stop of a planned tour.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Index of the location in the planning input.
    pub index: usize,
    /// Location name.
    pub name: String,
    /// Optional display label.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} - {label}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A solved tour with the stops resolved back to location names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourPlan {
    /// Name of the start location.
    pub start: String,
    /// Matrix indices in visiting order, closing on the start.
    pub route: Route,
    /// Stops in visiting order, closing on the start.
    pub stops: Vec<Stop>,
    /// Sum of edge costs in matrix units.
    pub total_distance: u64,
}

/// Errors raised while planning a tour.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// No location carries the requested start name.
    #[error("start location {name:?} is not among the locations")]
    UnknownStart {
        /// Requested start name.
        name: String,
    },
    /// The distance matrix could not be built.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// The solver failed.
    #[error(transparent)]
    Solve(#[from] SolveError),
    /// The solver returned something that is not a closed tour.
    #[error("solver returned an invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}

/// Build the matrix for `locations`, solve from `start_name` and resolve the
/// route back to named stops.
///
/// Every location must already carry coordinates; filter the output of
/// [`enrich_locations`](crate::enrich_locations) first when some addresses
/// could not be resolved.
///
/// # Errors
///
/// Returns [`PlanError::UnknownStart`] when no location is named
/// `start_name`, [`PlanError::Matrix`] for missing coordinates,
/// [`PlanError::Solve`] when the solver fails and
/// [`PlanError::InvalidRoute`] when its answer is not a Hamiltonian cycle.
///
/// # Examples
/// ```
/// use roundtrip_core::{
///     DistanceMatrix, DistanceMatrixBuilder, Location, Route, SolveError, TourSolver, plan_tour,
/// };
///
/// struct Straight;
///
/// impl TourSolver for Straight {
///     fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
///         Ok(Route::from_cycle((0..matrix.size()).map(|i| (start + i) % matrix.size()).collect()))
///     }
/// }
///
/// let locations = [
///     Location::at("a", 0.0, 0.0),
///     Location::at("b", 0.0, 1.0).with_label("bee"),
/// ];
/// let plan = plan_tour(&locations, "a", &Straight, &DistanceMatrixBuilder::new())?;
///
/// assert_eq!(plan.route.stops(), &[0, 1, 0]);
/// assert_eq!(plan.stops[1].to_string(), "b - bee");
/// # Ok::<(), roundtrip_core::PlanError>(())
/// ```
pub fn plan_tour<S>(
    locations: &[Location],
    start_name: &str,
    solver: &S,
    builder: &DistanceMatrixBuilder,
) -> Result<TourPlan, PlanError>
where
    S: TourSolver + ?Sized,
{
    let start = locations
        .iter()
        .position(|location| location.name == start_name)
        .ok_or_else(|| PlanError::UnknownStart {
            name: start_name.to_owned(),
        })?;

    let matrix = builder.build(locations)?;
    let route = solver.solve(&matrix, start)?;
    route.validate(matrix.size())?;
    let total_distance = matrix.tour_cost(&route).unwrap_or(u64::MAX);

    let stops = route
        .stops()
        .iter()
        .filter_map(|&index| {
            locations.get(index).map(|location| Stop {
                index,
                name: location.name.clone(),
                label: location.label.clone(),
            })
        })
        .collect();

    log::info!(
        "planned tour of {} locations from {start_name:?}: total distance {total_distance}",
        locations.len()
    );
    Ok(TourPlan {
        start: start_name.to_owned(),
        route,
        stops,
        total_distance,
    })
}
