//! Test helpers: temporary workspaces, location fixtures and stub
//! collaborators.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use roundtrip_core::test_support::StubGeoCoder;
use roundtrip_core::{GeoCoder, Location};
use roundtrip_data::store::save_locations;
use tempfile::TempDir;

use crate::CliError;
use crate::geocoder::{GeoCoderBuilder, GeocoderSettings};

pub(super) const HOME_QUERY: &str = "1 Main St, 12345";
pub(super) const WORK_QUERY: &str = "9 Side St, 12345";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    roundtrip_fs::write_file(path, contents).expect("write fixture");
}

/// A temporary directory addressed with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_locations(&self, name: &str, locations: &[Location]) -> Utf8PathBuf {
        let path = self.path(name);
        save_locations(&path, locations).expect("write locations");
        path
    }
}

/// Two street addresses the stub geocoder knows, without coordinates.
pub(super) fn street_records() -> Vec<Location> {
    vec![
        Location::new("Home", "1 Main St", "12345"),
        Location::new("Work", "9 Side St", "12345").with_label("Office"),
    ]
}

/// Hands out stub geocoders that know [`HOME_QUERY`] and [`WORK_QUERY`],
/// remembering the settings they were built with.
#[derive(Debug, Default)]
pub(super) struct StubGeoCoderBuilder {
    pub(super) seen: RefCell<Option<GeocoderSettings>>,
}

impl GeoCoderBuilder for StubGeoCoderBuilder {
    fn build(&self, settings: &GeocoderSettings) -> Result<Box<dyn GeoCoder>, CliError> {
        self.seen.replace(Some(settings.clone()));
        Ok(Box::new(
            StubGeoCoder::default()
                .with_match(HOME_QUERY, 40.0, -75.0)
                .with_match(WORK_QUERY, 40.1, -75.1),
        ))
    }
}
