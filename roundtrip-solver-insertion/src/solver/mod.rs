//! `InsertionSolver` implementation.

mod insertion;
mod two_opt;

use std::time::Instant;

use roundtrip_core::{DistanceMatrix, Route, SolveError, TourSolver, validate_start};

pub use insertion::cheapest_insertion;
pub use two_opt::two_opt;

/// Configuration for [`InsertionSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionSolverConfig {
    /// Upper bound on 2-opt improvement passes. Zero disables 2-opt.
    pub max_two_opt_passes: usize,
}

impl Default for InsertionSolverConfig {
    fn default() -> Self {
        Self {
            max_two_opt_passes: 1000,
        }
    }
}

/// Cheapest insertion followed by bounded 2-opt.
///
/// # Examples
/// ```
/// use roundtrip_core::{DistanceMatrix, TourSolver};
/// use roundtrip_solver_insertion::InsertionSolver;
///
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![0, 1, 2],
///     vec![1, 0, 1],
///     vec![2, 1, 0],
/// ])?;
/// let route = InsertionSolver::new().solve(&matrix, 0)?;
/// assert_eq!(route.stops(), &[0, 2, 1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSolver {
    config: InsertionSolverConfig,
}

impl InsertionSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: InsertionSolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &InsertionSolverConfig {
        &self.config
    }
}

impl TourSolver for InsertionSolver {
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
        if matrix.is_empty() {
            return Ok(Route::empty());
        }
        validate_start(matrix, start)?;
        let started_at = Instant::now();

        let mut tour = cheapest_insertion(matrix, start);
        let passes = two_opt(matrix, &mut tour, self.config.max_two_opt_passes);

        let route = Route::from_cycle(tour);
        log::debug!(
            "insertion solver: {} locations, {passes} 2-opt improvements, cost {:?}, {:?}",
            matrix.size(),
            matrix.tour_cost(&route),
            started_at.elapsed()
        );
        Ok(route)
    }
}
