use thiserror::Error;

/// Errors raised while building or validating a [`crate::DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// A location entered matrix construction without coordinates.
    ///
    /// This indicates a data-flow bug: callers must filter or geocode
    /// locations before building the matrix.
    #[error("location {name:?} at index {index} has no coordinates")]
    MissingCoordinate {
        /// Position of the location in the input slice.
        index: usize,
        /// Name of the location.
        name: String,
    },
    /// A supplied row did not match the number of rows.
    #[error("row {row} has {len} entries but the matrix has {size} rows")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Number of entries in that row.
        len: usize,
        /// Number of rows in the matrix.
        size: usize,
    },
    /// A supplied entry was negative.
    #[error("distance from {from} to {to} is negative ({value})")]
    NegativeDistance {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
        /// The rejected value.
        value: i64,
    },
    /// The scale factor was not a positive finite number.
    #[error("distance scale {scale} must be positive and finite")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },
    /// Scaling a distance produced a non-finite value.
    #[error("scaled distance between {from} and {to} is not finite")]
    NonFiniteDistance {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
    },
}
