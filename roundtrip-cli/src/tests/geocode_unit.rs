//! Focused unit tests covering geocode CLI configuration and execution.

use std::time::Duration;

use super::helpers::{StubGeoCoderBuilder, Workspace, street_records, write_utf8};
use super::*;
use crate::geocode::{
    GeocodeConfig, cache_path, config_from_layers_for_test, require_existing, run_geocode_with,
};
use crate::geocoder::DEFAULT_MIN_INTERVAL_MS;
use camino::Utf8PathBuf;
use roundtrip_core::{EnrichError, Location, UnresolvedPolicy};
use roundtrip_data::geocoding::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use roundtrip_data::store::load_locations;
use rstest::rstest;

fn args_for(input: Utf8PathBuf) -> GeocodeArgs {
    GeocodeArgs {
        input: Some(input),
        ..GeocodeArgs::default()
    }
}

#[rstest]
fn converting_without_input_errors() {
    let err = GeocodeConfig::try_from(GeocodeArgs::default()).expect_err("input is required");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_INPUT);
            assert_eq!(env, ENV_GEOCODE_INPUT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn defaults_write_next_to_the_input() {
    let config = GeocodeConfig::try_from(args_for(Utf8PathBuf::from("data/capitals.json")))
        .expect("config should build");

    assert_eq!(config.output, Utf8PathBuf::from("data/capitals_with_coords.json"));
    assert_eq!(config.policy, UnresolvedPolicy::Skip);
    assert_eq!(config.geocoder.http.base_url, DEFAULT_NOMINATIM_URL);
    assert_eq!(config.geocoder.http.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(config.geocoder.http.concurrency, 1);
    assert_eq!(
        config.geocoder.http.min_interval,
        Some(Duration::from_millis(DEFAULT_MIN_INTERVAL_MS))
    );
    assert_eq!(config.geocoder.retry.max_attempts, 3);
}

#[rstest]
#[case("capitals.json", "capitals_with_coords.json")]
#[case("data/capitals_with_coords.json", "data/capitals_with_coords.json")]
#[case("streets", "streets_with_coords")]
fn cache_path_reuses_an_existing_cache_file(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(cache_path(Utf8PathBuf::from(input).as_path()), Utf8PathBuf::from(expected));
}

#[rstest]
fn overrides_reach_the_geocoder_settings() {
    let args = GeocodeArgs {
        output: Some(Utf8PathBuf::from("out.json")),
        nominatim_url: Some("http://localhost:8080".to_owned()),
        user_agent: Some("tests/1.0".to_owned()),
        concurrency: Some(0),
        timeout_secs: Some(3),
        min_interval_ms: Some(0),
        max_attempts: Some(5),
        require_all: true,
        ..args_for(Utf8PathBuf::from("in.json"))
    };

    let config = GeocodeConfig::try_from(args).expect("config should build");

    assert_eq!(config.output, Utf8PathBuf::from("out.json"));
    assert_eq!(config.policy, UnresolvedPolicy::Abort);
    assert_eq!(config.geocoder.http.base_url, "http://localhost:8080");
    assert_eq!(config.geocoder.http.user_agent, "tests/1.0");
    assert_eq!(config.geocoder.http.concurrency, 1);
    assert_eq!(config.geocoder.http.timeout, Duration::from_secs(3));
    assert_eq!(config.geocoder.http.min_interval, None);
    assert_eq!(config.geocoder.retry.max_attempts, 5);
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "nominatim_url": "http://from-file:8080",
            "concurrency": 2,
        }),
        None,
    );
    composer.push_environment(json!({
        "input": "from-env.json",
        "concurrency": 3,
    }));
    composer.push_cli(json!({ "output": "from-cli.json" }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config should build");

    assert_eq!(config.input, Utf8PathBuf::from("from-env.json"));
    assert_eq!(config.output, Utf8PathBuf::from("from-cli.json"));
    assert_eq!(config.geocoder.http.base_url, "http://from-file:8080");
    assert_eq!(config.geocoder.http.concurrency, 3);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "concurrency": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    assert!(matches!(err, CliError::Configuration(_)), "found {err:?}");
}

#[rstest]
fn require_existing_reports_missing_and_directory_paths() {
    let workspace = Workspace::new();
    let missing = workspace.path("absent.json");
    let directory = workspace.path("folder");
    std::fs::create_dir(&directory).expect("create folder");

    assert!(matches!(
        require_existing(&missing, ARG_INPUT),
        Err(CliError::MissingSourceFile { field: ARG_INPUT, .. })
    ));
    assert!(matches!(
        require_existing(&directory, ARG_INPUT),
        Err(CliError::SourcePathNotFile { field: ARG_INPUT, .. })
    ));
}

#[rstest]
fn geocode_writes_the_annotated_file_and_a_summary() {
    let workspace = Workspace::new();
    let mut records = street_records();
    records.push(Location::new("Nowhere", "Lost Rd", ""));
    let input = workspace.write_locations("streets.json", &records);
    let builder = StubGeoCoderBuilder::default();
    let mut stdout = Vec::<u8>::new();

    run_geocode_with(args_for(input), &builder, &mut stdout).expect("geocode should succeed");

    let summary = String::from_utf8(stdout).expect("utf-8 output");
    assert!(
        summary.starts_with("Geocoded 2 of 3 locations (0 cached, 1 failed); wrote "),
        "unexpected summary: {summary}"
    );
    assert!(summary.contains("  Nowhere: no match found"));

    let saved = load_locations(&workspace.path("streets_with_coords.json")).expect("output exists");
    let geocoded: Vec<_> = saved.iter().filter(|loc| loc.is_geocoded()).map(|loc| loc.name.as_str()).collect();
    assert_eq!(geocoded, vec!["Home", "Work"]);
    assert_eq!(saved.len(), 3);
}

#[rstest]
fn require_all_aborts_without_writing() {
    let workspace = Workspace::new();
    let input = workspace.write_locations(
        "streets.json",
        &[Location::new("Nowhere", "Lost Rd", "")],
    );
    let args = GeocodeArgs {
        require_all: true,
        ..args_for(input)
    };
    let mut stdout = Vec::<u8>::new();

    let err = run_geocode_with(args, &StubGeoCoderBuilder::default(), &mut stdout)
        .expect_err("unresolved address should abort");

    assert!(
        matches!(&err, CliError::Geocode(EnrichError::Unresolved { name, .. }) if name == "Nowhere"),
        "found {err:?}"
    );
    assert!(!workspace.path("streets_with_coords.json").exists());
}

#[rstest]
fn malformed_input_is_reported_with_its_path() {
    let workspace = Workspace::new();
    let input = workspace.path("broken.json");
    write_utf8(&input, b"{ not json");

    let err = run_geocode_with(args_for(input), &StubGeoCoderBuilder::default(), &mut Vec::<u8>::new())
        .expect_err("input is malformed");

    assert!(matches!(err, CliError::Store(_)), "found {err:?}");
    assert!(err.to_string().contains("broken.json"));
}
