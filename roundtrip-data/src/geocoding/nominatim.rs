//! Nominatim `/search` response types.
//!
//! With `format=json` the service answers with an array of hits whose
//! coordinates are encoded as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use roundtrip_core::GeocodeError;
use serde::Deserialize;

/// One entry of a Nominatim search response.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    /// Latitude in degrees, as a string.
    pub lat: String,
    /// Longitude in degrees, as a string.
    pub lon: String,
    /// Human-readable name of the match.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchHit {
    /// Parse the hit's coordinates into a `Coord` (`x = lon`, `y = lat`).
    pub fn coordinates(&self) -> Result<Coord<f64>, GeocodeError> {
        let latitude = parse_degrees("lat", &self.lat)?;
        let longitude = parse_degrees("lon", &self.lon)?;
        Ok(Coord {
            x: longitude,
            y: latitude,
        })
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| GeocodeError::Parse {
            message: format!("{field} {raw:?} is not a number"),
        })
}

/// Pick the first hit of a response, or report that nothing matched.
pub fn first_match(hits: &[SearchHit], address: &str) -> Result<Coord<f64>, GeocodeError> {
    let hit = hits.first().ok_or_else(|| GeocodeError::NotFound {
        address: address.to_owned(),
    })?;
    log::debug!(
        "{address:?} matched {}",
        hit.display_name.as_deref().unwrap_or("an unnamed place")
    );
    hit.coordinates()
}
