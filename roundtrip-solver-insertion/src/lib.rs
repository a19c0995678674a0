//! Deterministic tour heuristic for Roundtrip.
//!
//! [`InsertionSolver`] implements [`TourSolver`](roundtrip_core::TourSolver)
//! in two phases. Cheapest insertion grows a closed tour from the start,
//! always adding the unvisited location whose best insertion adds the least
//! cost. A bounded 2-opt pass then removes crossing edges. Ties are broken by
//! index order throughout, so identical matrices always yield identical
//! routes.

#![forbid(unsafe_code)]

mod solver;

pub use solver::{InsertionSolver, InsertionSolverConfig, cheapest_insertion, two_opt};
