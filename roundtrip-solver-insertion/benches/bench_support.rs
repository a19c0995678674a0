//! Deterministic inputs for the insertion solver benchmarks.

use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roundtrip_core::{DistanceMatrix, DistanceMatrixBuilder};

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Generate `count` coordinates scattered across the contiguous United States.
#[must_use]
pub fn generate_coordinates(count: usize, seed: u64) -> Vec<Coord<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| Coord {
            x: rng.gen_range(-124.0..-67.0),
            y: rng.gen_range(25.0..49.0),
        })
        .collect()
}

/// Haversine matrix over [`generate_coordinates`].
///
/// # Panics
///
/// Panics if the generated coordinates cannot be turned into a matrix.
#[must_use]
#[expect(clippy::expect_used, reason = "benchmark setup should fail fast")]
pub fn generate_matrix(count: usize, seed: u64) -> DistanceMatrix {
    DistanceMatrixBuilder::new()
        .build_from_coords(&generate_coordinates(count, seed))
        .expect("generated coordinates are valid")
}
