//! Spherical great-circle distance.

use geo::Coord;

/// Mean Earth radius used by [`haversine_km`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two WGS84 coordinates, in kilometres.
///
/// Coordinates use `x = longitude` and `y = latitude`, both in degrees. The
/// haversine term is clamped to `[0, 1]` so rounding near antipodal points
/// cannot produce `NaN`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roundtrip_core::haversine_km;
///
/// let london = Coord { x: -0.1278, y: 51.5074 };
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let km = haversine_km(london, paris);
/// assert!((340.0..347.0).contains(&km));
/// assert_eq!(haversine_km(london, london), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let phi1 = a.y.to_radians();
    let phi2 = b.y.to_radians();
    let delta_phi = (b.y - a.y).to_radians();
    let delta_lambda = (b.x - a.x).to_radians();

    let raw = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let h = raw.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
