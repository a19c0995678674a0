//! JSON persistence for location records.
//!
//! Input files and the coordinate cache share one format: a JSON array of
//! location objects. Records that already carry `latitude` and `longitude`
//! are treated as geocoded, so saving an enriched list and loading it back
//! lets later runs skip the network.

use camino::{Utf8Path, Utf8PathBuf};
use roundtrip_core::Location;
use thiserror::Error;

/// Errors raised while reading or writing location files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read.
    #[error("failed to read locations from {path}: {source}")]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not a valid location array.
    #[error("failed to parse locations in {path}: {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Deserialisation error, including line and column.
        #[source]
        source: serde_json::Error,
    },
    /// The locations could not be encoded.
    #[error("failed to encode locations: {0}")]
    Encode(#[source] serde_json::Error),
    /// The file could not be written.
    #[error("failed to write locations to {path}: {source}")]
    Write {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Load location records from a JSON array file.
///
/// Records may use either field set accepted by [`Location`]'s
/// deserialiser, e.g. `state`/`capital`/`zip` or `name`/`label`/`postal_code`.
///
/// # Errors
///
/// Returns [`StoreError::Read`] when the file cannot be read and
/// [`StoreError::Parse`] when it is not a valid array of locations.
pub fn load_locations(path: &Utf8Path) -> Result<Vec<Location>, StoreError> {
    let contents = roundtrip_fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let locations: Vec<Location> =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("loaded {} locations from {path}", locations.len());
    Ok(locations)
}

/// Write locations to `path` as a pretty-printed JSON array.
///
/// The file is replaced atomically and missing parent directories are
/// created.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if serialisation fails and
/// [`StoreError::Write`] if the file cannot be written.
pub fn save_locations(path: &Utf8Path, locations: &[Location]) -> Result<(), StoreError> {
    let mut bytes = serde_json::to_vec_pretty(locations).map_err(StoreError::Encode)?;
    bytes.push(b'\n');
    roundtrip_fs::write_file(path, &bytes).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {} locations to {path}", locations.len());
    Ok(())
}
