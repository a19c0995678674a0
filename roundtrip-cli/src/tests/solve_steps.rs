//! Behaviour-driven step definitions driving the solve CLI scenarios.

use super::helpers::{StubGeoCoderBuilder, Workspace, street_records};
use super::*;
use crate::solve::{
    DefaultSolveSolverBuilder, SolveDeps, SolveSolverBuilder, SolverChoice, run_solve_with,
};
use camino::Utf8PathBuf;
use roundtrip_core::test_support::capitals;
use roundtrip_core::{DistanceMatrix, PlanError, Route, SolveError, TourSolver};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};

struct SolveWorld {
    workspace: Workspace,
    input: RefCell<Option<Utf8PathBuf>>,
    extra_args: RefCell<Vec<String>>,
    failing_solver: Cell<bool>,
    geocoders: StubGeoCoderBuilder,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SolveWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            input: RefCell::new(None),
            extra_args: RefCell::new(Vec::new()),
            failing_solver: Cell::new(false),
            geocoders: StubGeoCoderBuilder::default(),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self, start: &str) -> Vec<String> {
        let input = self.input.borrow().clone().expect("input file prepared");
        let mut argv = vec![
            "roundtrip".to_owned(),
            "solve".to_owned(),
            input.into_string(),
            "--start".to_owned(),
            start.to_owned(),
        ];
        argv.extend(self.extra_args.borrow().iter().cloned());
        argv
    }

    fn output(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> SolveWorld {
    SolveWorld::new()
}

struct FailingSolver;

impl TourSolver for FailingSolver {
    fn solve(&self, _matrix: &DistanceMatrix, _start: usize) -> Result<Route, SolveError> {
        Err(SolveError::Infeasible {
            reason: "stub solver gives up".to_owned(),
        })
    }
}

struct FailingSolverBuilder;

impl SolveSolverBuilder for FailingSolverBuilder {
    fn build(&self, _choice: &SolverChoice) -> Result<Box<dyn TourSolver>, CliError> {
        Ok(Box::new(FailingSolver))
    }
}

#[given("a location file with the Midwest capitals")]
fn capitals_file(#[from(world)] world: &SolveWorld) {
    let path = world.workspace.write_locations("capitals.json", &capitals());
    world.input.replace(Some(path));
}

#[given("a location file with street addresses")]
fn streets_file(#[from(world)] world: &SolveWorld) {
    let path = world.workspace.write_locations("streets.json", &street_records());
    world.input.replace(Some(path));
}

#[given("a solver that always fails")]
fn failing_solver(#[from(world)] world: &SolveWorld) {
    world.failing_solver.set(true);
}

#[given("geocoding is enabled")]
fn geocoding_enabled(#[from(world)] world: &SolveWorld) {
    world.extra_args.borrow_mut().push("--geocode".to_owned());
}

#[when("I run the solve command starting at {start}")]
fn run_solve_command(#[from(world)] world: &SolveWorld, start: String) {
    let invocation = world.build_command_line(start.trim_matches('"'));
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Solve(args) => {
            let solvers: &dyn SolveSolverBuilder = if world.failing_solver.get() {
                &FailingSolverBuilder
            } else {
                &DefaultSolveSolverBuilder
            };
            let deps = SolveDeps {
                solvers,
                geocoders: &world.geocoders,
            };
            let mut buffer = world.stdout.borrow_mut();
            run_solve_with(args, &deps, &mut *buffer)
        }
        Command::Geocode(_) => panic!("expected solve command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &SolveWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    assert!(result.is_ok(), "expected success, found {result:?}");
}

#[then("the output starts with {header}")]
fn output_starts_with(#[from(world)] world: &SolveWorld, header: String) {
    let output = world.output();
    assert_eq!(output.lines().next(), Some(header.trim_matches('"')));
}

#[then("the output lists {count} stops")]
fn output_lists_stops(#[from(world)] world: &SolveWorld, count: usize) {
    assert_eq!(world.output().lines().skip(1).count(), count);
}

#[then("the output is {text}")]
fn output_is(#[from(world)] world: &SolveWorld, text: String) {
    assert_eq!(world.output().trim_end(), text.trim_matches('"'));
}

#[then("the command fails because the solver failed")]
fn command_fails_solver(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    match &*error {
        CliError::Plan(PlanError::Solve(SolveError::Infeasible { .. })) => {}
        other => panic!("expected solver failure, found {other:?}"),
    }
}

#[then("the command fails because the start is unknown")]
fn command_fails_unknown_start(#[from(world)] world: &SolveWorld) {
    let error = world.error();
    match &*error {
        CliError::Plan(PlanError::UnknownStart { name }) => assert_eq!(name, "Atlantis"),
        other => panic!("expected UnknownStart, found {other:?}"),
    }
}

macro_rules! register_solve_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/solve_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SolveWorld) {
            let _ = world;
        }
    };
}

register_solve_scenario!(solve_prints_capitals, "printing the tour for geocoded capitals");
register_solve_scenario!(solve_reports_no_solution, "reporting when the solver finds nothing");
register_solve_scenario!(solve_rejects_unknown_start, "rejecting an unknown start");
register_solve_scenario!(solve_geocodes_first, "geocoding street addresses before solving");
