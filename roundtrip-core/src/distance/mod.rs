//! Great-circle distances and the integer distance matrix.
//!
//! [`haversine_km`] computes the spherical distance between two WGS84
//! coordinates. [`DistanceMatrixBuilder`] turns a slice of geocoded
//! [`Location`](crate::Location) values into a symmetric [`DistanceMatrix`]
//! of non-negative integers, the cost representation tour solvers consume.
//!
//! Errors are returned when a location lacks coordinates or when scaling
//! produces a value that cannot be represented.

mod builder;
mod error;
mod haversine;
mod matrix;

pub use builder::{DEFAULT_SCALE, DistanceMatrixBuilder};
pub use error::MatrixError;
pub use haversine::{EARTH_RADIUS_KM, haversine_km};
pub use matrix::DistanceMatrix;
