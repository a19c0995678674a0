//! Named locations awaiting (or carrying) geocoded coordinates.

use geo::Coord;
use thiserror::Error;

/// A place the tour must visit.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. They stay
/// `None` until a [`GeoCoder`](crate::GeoCoder) resolves the address; a
/// location without coordinates cannot enter the distance matrix.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roundtrip_core::Location;
///
/// let iowa = Location::new("Iowa", "1007 E Grand Ave, Des Moines", "50319")
///     .with_label("Des Moines");
/// assert!(!iowa.is_geocoded());
/// assert_eq!(iowa.geocode_query(), "1007 E Grand Ave, Des Moines, 50319");
///
/// let iowa = iowa.with_coordinates(Coord { x: -93.6037, y: 41.5911 });
/// assert_eq!(iowa.latitude(), Some(41.5911));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LocationRecord", into = "LocationRecord")
)]
pub struct Location {
    /// Unique identifier, e.g. a state name.
    pub name: String,
    /// Free-text street address.
    pub address: String,
    /// Postal code appended to the address when geocoding.
    pub postal_code: String,
    /// Optional display label printed next to the name.
    pub label: Option<String>,
    /// Geocoded position, if known.
    pub coordinates: Option<Coord<f64>>,
}

/// Errors returned when validating a [`Location`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// Only one of latitude and longitude was supplied.
    #[error("location {name:?} has only one of latitude and longitude")]
    PartialCoordinates {
        /// Name of the offending location.
        name: String,
    },
    /// A coordinate was outside the valid WGS84 range or not finite.
    #[error("location {name:?} has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Name of the offending location.
        name: String,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
}

impl Location {
    /// Construct a location that has not been geocoded yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            postal_code: postal_code.into(),
            label: None,
            coordinates: None,
        }
    }

    /// Construct an already geocoded location with no address.
    ///
    /// # Examples
    /// ```
    /// use roundtrip_core::Location;
    ///
    /// let origin = Location::at("origin", 0.0, 0.0);
    /// assert!(origin.is_geocoded());
    /// ```
    #[must_use]
    pub fn at(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::new(name, "", "").with_coordinates(Coord {
            x: longitude,
            y: latitude,
        })
    }

    /// Attach a display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach geocoded coordinates.
    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: Coord<f64>) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Latitude in degrees, if geocoded.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.map(|coord| coord.y)
    }

    /// Longitude in degrees, if geocoded.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.map(|coord| coord.x)
    }

    /// Whether coordinates are present.
    #[must_use]
    pub const fn is_geocoded(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Build the free-text query sent to a geocoder.
    ///
    /// The postal code is appended after a comma; blank parts are skipped so
    /// the query never carries dangling separators.
    #[must_use]
    pub fn geocode_query(&self) -> String {
        [self.address.trim(), self.postal_code.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check that coordinates, when present, are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidCoordinates`] when latitude falls
    /// outside `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn validate(&self) -> Result<(), LocationError> {
        let Some(coord) = self.coordinates else {
            return Ok(());
        };
        if valid_coordinate(coord.y, coord.x) {
            Ok(())
        } else {
            Err(LocationError::InvalidCoordinates {
                name: self.name.clone(),
                latitude: coord.y,
                longitude: coord.x,
            })
        }
    }
}

pub(crate) fn valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Flat on-disk shape of a location record.
///
/// Aliases accept the state/capital data set the tool was first written
/// against.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct LocationRecord {
    #[serde(alias = "state")]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default, alias = "zip")]
    postal_code: String,
    #[serde(default, alias = "capital", skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<LocationRecord> for Location {
    type Error = LocationError;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        let coordinates = match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coord {
                x: longitude,
                y: latitude,
            }),
            (None, None) => None,
            _ => return Err(LocationError::PartialCoordinates { name: record.name }),
        };
        let location = Self {
            name: record.name,
            address: record.address,
            postal_code: record.postal_code,
            label: record.label,
            coordinates,
        };
        location.validate()?;
        Ok(location)
    }
}

#[cfg(feature = "serde")]
impl From<Location> for LocationRecord {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.latitude(),
            longitude: location.longitude(),
            name: location.name,
            address: location.address,
            postal_code: location.postal_code,
            label: location.label,
        }
    }
}
