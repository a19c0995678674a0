//! Test doubles and fixtures shared by unit, behaviour and downstream tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{DistanceMatrix, GeoCoder, GeocodeError, Location, Route, SolveError, TourSolver};

/// `GeoCoder` answering from a fixed address table.
///
/// Unknown addresses fail with [`GeocodeError::NotFound`].
#[derive(Debug, Default)]
pub struct StubGeoCoder {
    answers: HashMap<String, Result<Coord<f64>, GeocodeError>>,
    calls: AtomicUsize,
}

impl StubGeoCoder {
    /// Answer `query` with the given latitude and longitude.
    #[must_use]
    pub fn with_match(mut self, query: &str, latitude: f64, longitude: f64) -> Self {
        self.answers.insert(
            query.to_owned(),
            Ok(Coord {
                x: longitude,
                y: latitude,
            }),
        );
        self
    }

    /// Answer `query` with an error.
    #[must_use]
    pub fn with_failure(mut self, query: &str, error: GeocodeError) -> Self {
        self.answers.insert(query.to_owned(), Err(error));
        self
    }

    /// Number of `resolve` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoCoder for StubGeoCoder {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(address)
            .cloned()
            .unwrap_or_else(|| {
                Err(GeocodeError::NotFound {
                    address: address.to_owned(),
                })
            })
    }
}

/// `GeoCoder` replaying scripted results in call order, whatever the address.
///
/// Once the script runs out every call fails with [`GeocodeError::NotFound`].
#[derive(Debug, Default)]
pub struct ScriptedGeoCoder {
    script: Mutex<VecDeque<Result<Coord<f64>, GeocodeError>>>,
    calls: AtomicUsize,
}

impl ScriptedGeoCoder {
    /// Replay `script` one entry per call.
    #[must_use]
    pub fn new(script: Vec<Result<Coord<f64>, GeocodeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoCoder for ScriptedGeoCoder {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        next.unwrap_or_else(|| {
            Err(GeocodeError::NotFound {
                address: address.to_owned(),
            })
        })
    }
}

/// `TourSolver` visiting locations in index order after the start.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexOrderSolver;

impl TourSolver for IndexOrderSolver {
    fn solve(&self, matrix: &DistanceMatrix, start: usize) -> Result<Route, SolveError> {
        if matrix.is_empty() {
            return Ok(Route::empty());
        }
        crate::validate_start(matrix, start)?;
        let order = std::iter::once(start)
            .chain((0..matrix.size()).filter(|&index| index != start))
            .collect();
        Ok(Route::from_cycle(order))
    }
}

/// Corners of a one-degree square at the origin, named `A` to `D`.
///
/// `A (0, 0)`, `B (0, 1)`, `C (1, 1)`, `D (1, 0)` as (latitude, longitude).
#[must_use]
pub fn unit_square() -> Vec<Location> {
    vec![
        Location::at("A", 0.0, 0.0),
        Location::at("B", 0.0, 1.0),
        Location::at("C", 1.0, 1.0),
        Location::at("D", 1.0, 0.0),
    ]
}

/// A handful of Midwestern state capitals with coordinates and labels.
#[must_use]
pub fn capitals() -> Vec<Location> {
    vec![
        Location::at("Iowa", 41.5911, -93.6037).with_label("Des Moines"),
        Location::at("Illinois", 39.7983, -89.6544).with_label("Springfield"),
        Location::at("Missouri", 38.5767, -92.1735).with_label("Jefferson City"),
        Location::at("Nebraska", 40.8081, -96.6997).with_label("Lincoln"),
        Location::at("Kansas", 39.0483, -95.6780).with_label("Topeka"),
        Location::at("Minnesota", 44.9551, -93.1022).with_label("Saint Paul"),
        Location::at("Wisconsin", 43.0747, -89.3842).with_label("Madison"),
    ]
}

/// Matrix with cost one between distinct locations.
#[must_use]
pub fn unit_matrix(size: usize) -> DistanceMatrix {
    let rows = (0..size)
        .map(|i| (0..size).map(|j| i64::from(i != j)).collect())
        .collect();
    DistanceMatrix::from_rows(rows).unwrap_or_else(|_| DistanceMatrix::empty())
}
