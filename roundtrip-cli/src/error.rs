//! Error types emitted by the Roundtrip CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roundtrip_core::{EnrichError, PlanError};
use roundtrip_data::geocoding::ProviderBuildError;
use roundtrip_data::store::StoreError;
use thiserror::Error;

/// Errors emitted by the Roundtrip CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Installing the logger failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] log::SetLoggerError),
    /// Loading or saving location records failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Constructing the HTTP geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeoCoder {
        /// Configured service URL.
        base_url: String,
        /// Construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Geocoding could not complete under the chosen policy.
    #[error("geocoding failed: {0}")]
    Geocode(#[from] EnrichError),
    /// The tour could not be planned.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// Serialising the tour plan failed.
    #[error("failed to serialise tour plan: {0}")]
    SerialiseTourPlan(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
