//! Shared test harness modules for the Roundtrip CLI.

use super::*;

mod geocode_unit;
mod helpers;
mod solve_steps;
