//! Closed tours over matrix indices.
//!
//! A route lists the stops in visiting order and returns to its first stop.

use std::collections::HashSet;

use thiserror::Error;

/// Ordered stops forming a Hamiltonian cycle over matrix indices.
///
/// For two or more locations the route starts and ends at the same index and
/// visits every other index exactly once, so it holds `n + 1` stops. A single
/// location yields the one-stop route `[start]`; an empty matrix yields an
/// empty route.
///
/// # Examples
/// ```
/// use roundtrip_core::Route;
///
/// let route = Route::from_cycle(vec![2, 0, 1]);
/// assert_eq!(route.stops(), &[2, 0, 1, 2]);
/// assert_eq!(route.start(), Some(2));
/// assert!(route.validate(3).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Route {
    stops: Vec<usize>,
}

/// Reasons a [`Route`] is not a valid closed tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The number of stops does not match the matrix size.
    #[error("route has {actual} stops but {expected} were expected")]
    WrongLength {
        /// Expected number of stops.
        expected: usize,
        /// Actual number of stops.
        actual: usize,
    },
    /// The route does not return to its first stop.
    #[error("route starts at {first} but ends at {last}")]
    NotClosed {
        /// First stop.
        first: usize,
        /// Last stop.
        last: usize,
    },
    /// A stop references an index outside the matrix.
    #[error("stop {index} is outside a matrix of size {size}")]
    UnknownIndex {
        /// Offending index.
        index: usize,
        /// Matrix size.
        size: usize,
    },
    /// A location is visited more than once.
    #[error("location {index} is visited more than once")]
    Duplicate {
        /// Repeated index.
        index: usize,
    },
}

impl Route {
    /// Route with no stops.
    #[must_use]
    pub const fn empty() -> Self {
        Self { stops: Vec::new() }
    }

    /// Close a visiting order by returning to its first stop.
    ///
    /// Orders with fewer than two stops are kept as they are.
    #[must_use]
    pub fn from_cycle(mut order: Vec<usize>) -> Self {
        if order.len() >= 2
            && let Some(&start) = order.first()
        {
            order.push(start);
        }
        Self { stops: order }
    }

    /// Wrap explicit stops after checking they form a closed tour over a
    /// matrix of `size` locations.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouteError`] found by [`Route::validate`].
    pub fn from_stops(stops: Vec<usize>, size: usize) -> Result<Self, RouteError> {
        let route = Self { stops };
        route.validate(size)?;
        Ok(route)
    }

    /// Stops in visiting order, including the closing return.
    #[must_use]
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Stops without the closing return to the start.
    #[must_use]
    pub fn visits(&self) -> &[usize] {
        match self.stops.split_last() {
            Some((_, rest)) if self.stops.len() >= 2 => rest,
            _ => &self.stops,
        }
    }

    /// First stop, if any.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.stops.first().copied()
    }

    /// Number of stops including the closing return.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the route has no stops.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Consume the route, returning its stops.
    #[must_use]
    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    /// Check the route is a Hamiltonian cycle over `size` locations.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WrongLength`] when the stop count is not
    /// `size + 1` (or `size` for zero or one location),
    /// [`RouteError::NotClosed`] when the last stop differs from the first,
    /// [`RouteError::UnknownIndex`] for indices `>= size` and
    /// [`RouteError::Duplicate`] for repeated visits.
    pub fn validate(&self, size: usize) -> Result<(), RouteError> {
        let expected = if size <= 1 { size } else { size + 1 };
        if self.stops.len() != expected {
            return Err(RouteError::WrongLength {
                expected,
                actual: self.stops.len(),
            });
        }
        if let (Some(&first), Some(&last)) = (self.stops.first(), self.stops.last())
            && first != last
        {
            return Err(RouteError::NotClosed { first, last });
        }
        let mut seen = HashSet::with_capacity(size);
        for &index in self.visits() {
            if index >= size {
                return Err(RouteError::UnknownIndex { index, size });
            }
            if !seen.insert(index) {
                return Err(RouteError::Duplicate { index });
            }
        }
        Ok(())
    }
}
