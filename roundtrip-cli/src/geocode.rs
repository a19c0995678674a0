//! Geocode command implementation for the Roundtrip CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roundtrip_core::{GeocodeReport, UnresolvedPolicy, enrich_locations};
use roundtrip_data::store::{load_locations, save_locations};
use serde::{Deserialize, Serialize};

use crate::geocoder::{GeoCoderBuilder, GeocoderOverrides, GeocoderSettings, NominatimGeoCoderBuilder};
use crate::{ARG_INPUT, CliError, ENV_GEOCODE_INPUT};

/// Suffix appended to the input stem for the default output file.
pub(crate) const OUTPUT_SUFFIX: &str = "_with_coords";

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "geocode",
    long_about = "Resolve the address of every location that lacks \
                 coordinates and write the annotated records to a new \
                 JSON file. Records that already carry coordinates are \
                 kept as they are, so the output doubles as a cache.",
    about = "Add coordinates to a location file"
)]
#[ortho_config(prefix = "ROUNDTRIP")]
pub(crate) struct GeocodeArgs {
    /// Path to the JSON array of location records.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Where to write the annotated records (default: `<input>_with_coords.json`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Base URL of a Nominatim-compatible service.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// User agent sent with every request.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Maximum number of lookups in flight.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) concurrency: Option<usize>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Minimum pause between request starts in milliseconds (0 disables).
    #[arg(long, value_name = "ms")]
    #[serde(default)]
    pub(crate) min_interval_ms: Option<u64>,
    /// Attempts per address before giving up on transient failures.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Fail instead of skipping addresses that cannot be resolved.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) require_all: bool,
}

impl GeocodeArgs {
    pub(crate) fn into_config(self) -> Result<GeocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GeocodeConfig::try_from(merged)
    }
}

/// Resolved `geocode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
    pub(crate) geocoder: GeocoderSettings,
    pub(crate) policy: UnresolvedPolicy,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_GEOCODE_INPUT,
        })?;
        let output = args.output.unwrap_or_else(|| cache_path(&input));
        let geocoder = GeocoderSettings::from(GeocoderOverrides {
            base_url: args.nominatim_url,
            user_agent: args.user_agent,
            concurrency: args.concurrency,
            timeout_secs: args.timeout_secs,
            min_interval_ms: args.min_interval_ms,
            max_attempts: args.max_attempts,
        });
        let policy = if args.require_all {
            UnresolvedPolicy::Abort
        } else {
            UnresolvedPolicy::Skip
        };
        Ok(Self {
            input,
            output,
            geocoder,
            policy,
        })
    }
}

/// File that caches coordinates resolved for `input`.
///
/// This is the `_with_coords` sibling of `input`, or `input` itself when it
/// already is such a file.
pub(crate) fn cache_path(input: &Utf8Path) -> Utf8PathBuf {
    match input.file_stem() {
        Some(stem) if stem.ends_with(OUTPUT_SUFFIX) => input.to_path_buf(),
        _ => roundtrip_fs::sibling_with_suffix(input, OUTPUT_SUFFIX),
    }
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match roundtrip_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(super) fn run_geocode(args: GeocodeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_geocode_with(args, &NominatimGeoCoderBuilder, &mut stdout)
}

pub(super) fn run_geocode_with(
    args: GeocodeArgs,
    builder: &dyn GeoCoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.input, ARG_INPUT)?;
    let report = execute_geocode(&config, builder)?;
    write_summary(writer, &config.output, &report)
}

fn execute_geocode(
    config: &GeocodeConfig,
    builder: &dyn GeoCoderBuilder,
) -> Result<GeocodeReport, CliError> {
    let locations = load_locations(&config.input)?;
    let coder = builder.build(&config.geocoder)?;
    let report = enrich_locations(&coder, locations, config.policy)?;
    save_locations(&config.output, &report.locations)?;
    Ok(report)
}

fn write_summary(
    writer: &mut dyn Write,
    output: &Utf8Path,
    report: &GeocodeReport,
) -> Result<(), CliError> {
    writeln!(
        writer,
        "Geocoded {} of {} locations ({} cached, {} failed); wrote {output}",
        report.geocoded().count(),
        report.locations.len(),
        report.cached,
        report.failures.len()
    )
    .map_err(CliError::WriteOutput)?;
    for failure in &report.failures {
        writeln!(writer, "  {}: {}", failure.name, failure.error).map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<GeocodeConfig, CliError> {
    let merged = GeocodeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    GeocodeConfig::try_from(merged)
}
