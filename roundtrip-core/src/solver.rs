use thiserror::Error;

use crate::{DistanceMatrix, Route};

/// Errors returned by [`TourSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The start index does not name a location in the matrix.
    #[error("start index {start} is out of range for {size} locations")]
    InvalidStartIndex {
        /// Requested start index.
        start: usize,
        /// Number of locations in the matrix.
        size: usize,
    },
    /// The solver could not produce a closed tour.
    ///
    /// Complete matrices always admit a tour, so this signals a solver or
    /// input defect rather than a property of the data.
    #[error("no feasible tour found: {reason}")]
    Infeasible {
        /// Solver-specific explanation.
        reason: String,
    },
}

/// Find a short closed tour through every location of a distance matrix.
///
/// Implementations return a [`Route`] that starts and ends at `start` and
/// visits every other index exactly once. An empty matrix yields
/// [`Route::empty`]; an out-of-range `start` yields
/// [`SolveError::InvalidStartIndex`]. Solvers must be `Send + Sync` so they
/// can be shared across threads and boxed behind `dyn TourSolver`.
///
/// # Examples
///
/// ```rust
/// use roundtrip_core::{DistanceMatrix, Route, SolveError, TourSolver, validate_start};
///
/// /// Visits locations in index order.
/// struct IndexOrder;
///
/// impl TourSolver for IndexOrder {
///     fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
///         if matrix.is_empty() {
///             return Ok(Route::empty());
///         }
///         validate_start(matrix, start)?;
///         let order = std::iter::once(start)
///             .chain((0..matrix.size()).filter(|&i| i != start))
///             .collect();
///         Ok(Route::from_cycle(order))
///     }
/// }
///
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1, 0]])?;
/// let route = IndexOrder.solve(&matrix, 1)?;
/// assert_eq!(route.stops(), &[1, 0, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TourSolver: Send + Sync {
    /// Solve for a closed tour beginning at `start`.
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError>;
}

impl<T: TourSolver + ?Sized> TourSolver for Box<T> {
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
        (**self).solve(matrix, start)
    }
}

impl<T: TourSolver + ?Sized> TourSolver for &T {
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
        (**self).solve(matrix, start)
    }
}

/// Check that `start` indexes a location of `matrix`.
///
/// # Errors
///
/// Returns [`SolveError::InvalidStartIndex`] when `start >= matrix.size()`.
pub const fn validate_start(matrix: &DistanceMatrix, start: usize) -> Result<(), SolveError> {
    let size = matrix.size();
    if start < size {
        Ok(())
    } else {
        Err(SolveError::InvalidStartIndex { start, size })
    }
}
