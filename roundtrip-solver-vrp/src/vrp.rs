//! `vrp-core` modelling helpers for `VrpTourSolver`.
//!
//! This module converts a distance matrix into a single-vehicle `vrp-core`
//! problem, runs the solver, and translates the resulting tour back into
//! matrix indices.

use std::sync::Arc;

use roundtrip_core::{DistanceMatrix, SolveError};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::solver::VrpTourSolverConfig;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    size: usize,
    start: Location,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = (0..size)
        .filter(|&index| index != start)
        .map(|index| {
            SingleBuilder::default()
                .id(format!("stop{index}").as_str())
                .location(index)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("traveller")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(start)
                .set_end_location(start)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Row-major matrix costs as `vrp-core` floats.
struct MatrixTransportCost {
    size: usize,
    costs: Vec<f64>,
}

impl MatrixTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "tour legs stay far below 2^53 matrix units"
    )]
    fn new(matrix: &DistanceMatrix) -> Self {
        let costs = matrix.rows().flatten().map(|&cost| cost as f64).collect();
        Self {
            size: matrix.size(),
            costs,
        }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = from
            .checked_mul(self.size)
            .and_then(|row| row.checked_add(to))
            .filter(|_| to < self.size)
            .and_then(|cell| self.costs.get(cell))
            .copied();
        debug_assert!(
            result.is_some(),
            "Matrix lookup failed: from={from}, to={to}"
        );
        result.unwrap_or(0.0)
    }
}

impl TransportCost for MatrixTransportCost {
    // The trait passes the route and departure time so other implementations
    // can vary costs by vehicle or time of day; a static matrix ignores both.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

/// Context for running a `vrp-core` solve with shared configuration.
pub(super) struct VrpSolveContext<'a> {
    config: &'a VrpTourSolverConfig,
}

impl<'a> VrpSolveContext<'a> {
    /// Create a new solve context.
    pub(super) const fn new(config: &'a VrpTourSolverConfig) -> Self {
        Self { config }
    }

    /// Solve for a visiting order starting at `start`, without the closing
    /// return.
    pub(super) fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
    ) -> Result<Vec<usize>, SolveError> {
        let transport = Arc::new(MatrixTransportCost::new(matrix));
        let goal = define_goal(transport.clone()).map_err(model_error)?;
        let problem = Arc::new(
            define_problem(matrix.size(), start, transport, goal).map_err(model_error)?,
        );

        let vrp_config = VrpConfigBuilder::new(problem.clone())
            .prebuild()
            .map_err(model_error)?
            .with_max_generations(Some(self.config.max_generations))
            .with_max_time(self.config.max_time_secs)
            .build()
            .map_err(model_error)?;

        let solution = vrp_core::solver::Solver::new(problem, vrp_config)
            .solve()
            .map_err(model_error)?;

        if !solution.unassigned.is_empty() {
            return Err(SolveError::Infeasible {
                reason: format!("{} locations left unassigned", solution.unassigned.len()),
            });
        }

        let order = std::iter::once(start)
            .chain(
                solution
                    .get_locations()
                    .flatten()
                    .filter(|&location| location != start),
            )
            .collect();
        Ok(order)
    }
}

fn model_error(err: impl std::fmt::Display) -> SolveError {
    SolveError::Infeasible {
        reason: err.to_string(),
    }
}
