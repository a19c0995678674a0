//! `VrpTourSolver` implementation backed by `vrp-core`.

use std::time::Instant;

use roundtrip_core::{DistanceMatrix, Route, SolveError, TourSolver, validate_start};

use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpTourSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpTourSolverConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
    /// Optional wall-clock limit in seconds.
    pub max_time_secs: Option<usize>,
}

impl Default for VrpTourSolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
            max_time_secs: None,
        }
    }
}

/// Solver using `vrp-core` metaheuristics to search for a short tour.
#[derive(Debug, Clone, Copy, Default)]
pub struct VrpTourSolver {
    config: VrpTourSolverConfig,
}

impl VrpTourSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpTourSolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpTourSolverConfig {
        &self.config
    }
}

impl TourSolver for VrpTourSolver {
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
        if matrix.is_empty() {
            return Ok(Route::empty());
        }
        validate_start(matrix, start)?;

        // One or two locations admit a single tour; the engine adds nothing.
        if matrix.size() <= 2 {
            let order = std::iter::once(start)
                .chain((0..matrix.size()).filter(|&index| index != start))
                .collect();
            return Ok(Route::from_cycle(order));
        }

        let started_at = Instant::now();
        let order = VrpSolveContext::new(&self.config).solve(matrix, start)?;
        let route = Route::from_cycle(order);
        route
            .validate(matrix.size())
            .map_err(|err| SolveError::Infeasible {
                reason: format!("vrp-core returned an invalid tour: {err}"),
            })?;

        log::debug!(
            "vrp solver: {} locations, cost {:?}, {:?}",
            matrix.size(),
            matrix.tour_cost(&route),
            started_at.elapsed()
        );
        Ok(route)
    }
}
