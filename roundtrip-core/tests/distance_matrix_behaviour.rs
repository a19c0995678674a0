//! Behavioural tests for building distance matrices from locations.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use roundtrip_core::{DistanceMatrix, DistanceMatrixBuilder, Location, MatrixError};

#[derive(Debug, Default)]
struct MatrixWorld {
    locations: RefCell<Vec<Location>>,
    result: RefCell<Option<Result<DistanceMatrix, MatrixError>>>,
}

#[fixture]
fn world() -> MatrixWorld {
    MatrixWorld::default()
}

#[given("the locations of four state capitals")]
fn given_capitals(world: &MatrixWorld) {
    world.locations.replace(vec![
        Location::at("Iowa", 41.5911, -93.6037).with_label("Des Moines"),
        Location::at("Illinois", 39.7983, -89.6544).with_label("Springfield"),
        Location::at("Missouri", 38.5767, -92.1735).with_label("Jefferson City"),
        Location::at("Nebraska", 40.8081, -96.6997).with_label("Lincoln"),
    ]);
}

#[given("a location {name} without coordinates")]
fn given_ungeocoded(world: &MatrixWorld, name: String) {
    let clean = name.trim_matches('"');
    world
        .locations
        .borrow_mut()
        .push(Location::new(clean, "unknown", ""));
}

#[when("I build the distance matrix")]
fn when_build(world: &MatrixWorld) {
    let result = DistanceMatrixBuilder::new().build(&world.locations.borrow());
    world.result.replace(Some(result));
}

#[then("the matrix is {size} by {other}")]
fn then_size(world: &MatrixWorld, size: usize, other: usize) {
    let borrowed = world.result.borrow();
    let matrix = borrowed
        .as_ref()
        .expect("matrix should be built")
        .as_ref()
        .expect("build should succeed");
    assert_eq!(matrix.size(), size);
    assert_eq!(matrix.rows().count(), other);
}

#[then("the matrix is symmetric with a zero diagonal")]
fn then_symmetric(world: &MatrixWorld) {
    let borrowed = world.result.borrow();
    let matrix = borrowed
        .as_ref()
        .expect("matrix should be built")
        .as_ref()
        .expect("build should succeed");
    assert!(matrix.is_symmetric());
    for i in 0..matrix.size() {
        assert_eq!(matrix.get(i, i), Some(0));
    }
}

#[then("the build fails naming {name}")]
fn then_fails(world: &MatrixWorld, name: String) {
    let borrowed = world.result.borrow();
    let err = borrowed
        .as_ref()
        .expect("matrix should be built")
        .as_ref()
        .expect_err("build should fail");
    match err {
        MatrixError::MissingCoordinate { name: missing, .. } => {
            assert_eq!(missing, name.trim_matches('"'));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[scenario(path = "tests/features/distance_matrix.feature", index = 0)]
fn symmetric_matrix(world: MatrixWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/distance_matrix.feature", index = 1)]
fn missing_coordinate(world: MatrixWorld) {
    let _ = world;
}
