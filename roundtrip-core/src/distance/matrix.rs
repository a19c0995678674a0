//! Square, non-negative integer cost matrix.

use crate::Route;

use super::error::MatrixError;

/// Square matrix of non-negative integer distances.
///
/// Cells are stored row-major. `distance(i, j)` is the cost of travelling
/// from location `i` to location `j`. Matrices produced by
/// [`DistanceMatrixBuilder`](super::DistanceMatrixBuilder) are symmetric with
/// a zero diagonal; matrices supplied through [`DistanceMatrix::from_rows`]
/// only need to be square and non-negative.
///
/// # Examples
/// ```
/// use roundtrip_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::from_rows(vec![vec![0, 7], vec![7, 0]])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(0, 1), Some(7));
/// assert!(matrix.is_symmetric());
/// # Ok::<(), roundtrip_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    /// Matrix with no locations.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            size: 0,
            cells: Vec::new(),
        }
    }

    /// Build a matrix from caller-supplied rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] when any row length differs from
    /// the number of rows and [`MatrixError::NegativeDistance`] for negative
    /// entries.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size.saturating_mul(size));
        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: from,
                    len: row.len(),
                    size,
                });
            }
            for (to, value) in row.into_iter().enumerate() {
                let cell = u64::try_from(value)
                    .map_err(|_| MatrixError::NegativeDistance { from, to, value })?;
                cells.push(cell);
            }
        }
        Ok(Self { size, cells })
    }

    /// Build a symmetric matrix by evaluating `cost` once per unordered pair.
    ///
    /// The diagonal is zero. `cost(i, j)` is only called with `i < j`, and
    /// its result is written to both `(i, j)` and `(j, i)`.
    pub(crate) fn try_symmetric<F>(size: usize, mut cost: F) -> Result<Self, MatrixError>
    where
        F: FnMut(usize, usize) -> Result<u64, MatrixError>,
    {
        let mut cells = vec![0_u64; size.saturating_mul(size)];
        for from in 0..size {
            for to in (from + 1)..size {
                let value = cost(from, to)?;
                if let Some(cell) = cells.get_mut(from * size + to) {
                    *cell = value;
                }
                if let Some(cell) = cells.get_mut(to * size + from) {
                    *cell = value;
                }
            }
        }
        Ok(Self { size, cells })
    }

    /// Number of locations (rows).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from `from` to `to`, or `None` when either index is out of
    /// range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells.get(from * self.size + to).copied()
    }

    /// Distance from `from` to `to` for indices already checked by the
    /// caller.
    ///
    /// Out-of-range lookups return `u64::MAX` so that a misuse can never make
    /// a tour look cheaper.
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> u64 {
        self.get(from, to).unwrap_or(u64::MAX)
    }

    /// Row `from`, or `None` when out of range.
    #[must_use]
    pub fn row(&self, from: usize) -> Option<&[u64]> {
        if from >= self.size {
            return None;
        }
        let start = from.checked_mul(self.size)?;
        self.cells.get(start..start.checked_add(self.size)?)
    }

    /// Iterate over rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Copy the matrix into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.rows().map(<[u64]>::to_vec).collect()
    }

    /// Whether `distance(i, j) == distance(j, i)` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|from| {
            ((from + 1)..self.size).all(|to| self.get(from, to) == self.get(to, from))
        })
    }

    /// Total cost of walking `route` stop by stop.
    ///
    /// Returns `None` if the route references an index outside the matrix.
    /// The sum saturates at `u64::MAX`.
    #[must_use]
    pub fn tour_cost(&self, route: &Route) -> Option<u64> {
        route
            .stops()
            .windows(2)
            .try_fold(0_u64, |total, leg| match leg {
                [from, to] => self.get(*from, *to).map(|cost| total.saturating_add(cost)),
                _ => Some(total),
            })
    }
}
