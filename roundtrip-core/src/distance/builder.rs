//! Turn geocoded locations into an integer distance matrix.

use geo::Coord;

use crate::Location;

use super::{DistanceMatrix, MatrixError, haversine_km};

/// Default multiplier applied to kilometre distances (kilometres to metres).
pub const DEFAULT_SCALE: f64 = 1000.0;

/// Builds a [`DistanceMatrix`] from coordinates using haversine distances.
///
/// Each kilometre distance is multiplied by the scale (default
/// [`DEFAULT_SCALE`]) and truncated towards zero. The truncation is a lossy
/// quantisation: integer solvers require integer costs, so sub-unit
/// differences between legs are discarded. With the default scale the unit
/// is one metre.
///
/// Every unordered pair is evaluated once and mirrored, so the result is
/// exactly symmetric with a zero diagonal.
///
/// # Examples
/// ```
/// use roundtrip_core::{DistanceMatrixBuilder, Location};
///
/// let locations = [Location::at("a", 0.0, 0.0), Location::at("b", 1.0, 0.0)];
/// let matrix = DistanceMatrixBuilder::new().build(&locations)?;
/// assert_eq!(matrix.get(0, 1), Some(111_194));
/// assert_eq!(matrix.get(1, 0), Some(111_194));
/// # Ok::<(), roundtrip_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceMatrixBuilder {
    scale: f64,
}

impl Default for DistanceMatrixBuilder {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl DistanceMatrixBuilder {
    /// Builder using [`DEFAULT_SCALE`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the kilometre multiplier.
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// The configured kilometre multiplier.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Build the matrix for `locations` in slice order.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::MissingCoordinate`] naming the first location
    /// without coordinates. No placeholder coordinates are ever substituted.
    /// See [`Self::build_from_coords`] for the remaining error cases.
    pub fn build(&self, locations: &[Location]) -> Result<DistanceMatrix, MatrixError> {
        let coords = locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                location
                    .coordinates
                    .ok_or_else(|| MatrixError::MissingCoordinate {
                        index,
                        name: location.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.build_from_coords(&coords)
    }

    /// Build the matrix for raw coordinates (`x = longitude`, `y = latitude`).
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidScale`] for a non-positive or non-finite
    /// scale and [`MatrixError::NonFiniteDistance`] when a coordinate pair
    /// produces a non-finite distance.
    pub fn build_from_coords(&self, coords: &[Coord<f64>]) -> Result<DistanceMatrix, MatrixError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MatrixError::InvalidScale { scale: self.scale });
        }
        let matrix = DistanceMatrix::try_symmetric(coords.len(), |from, to| {
            match (coords.get(from), coords.get(to)) {
                (Some(a), Some(b)) => self.quantise(haversine_km(*a, *b), from, to),
                _ => Err(MatrixError::NonFiniteDistance { from, to }),
            }
        })?;
        log::debug!(
            "built {n}x{n} distance matrix (scale {scale})",
            n = matrix.size(),
            scale = self.scale
        );
        Ok(matrix)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "scaling kilometre distances is floating-point by nature"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "truncation to whole units is the documented quantisation"
    )]
    fn quantise(&self, km: f64, from: usize, to: usize) -> Result<u64, MatrixError> {
        let scaled = km * self.scale;
        if !scaled.is_finite() || scaled < 0.0 {
            return Err(MatrixError::NonFiniteDistance { from, to });
        }
        Ok(scaled.trunc() as u64)
    }
}
