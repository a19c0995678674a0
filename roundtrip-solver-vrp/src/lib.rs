//! `vrp-core` backed tour solver for Roundtrip.
//!
//! This crate provides [`VrpTourSolver`], an implementation of the
//! [`TourSolver`](roundtrip_core::TourSolver) trait that models the tour as a
//! single-vehicle VRP: one vehicle starts and ends at the start location and
//! every other location is a mandatory job. The goal minimises unassigned
//! jobs first and travelled distance second.
//!
//! The metaheuristic is not deterministic across runs; use the insertion
//! solver when repeatable output matters.

#![forbid(unsafe_code)]

mod solver;
mod vrp;

pub use solver::{VrpTourSolver, VrpTourSolverConfig};
