//! Great-circle distances on a spherical Earth.

use geo::Coord;

use super::error::DistanceError;
use super::provider::DistanceProvider;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in meters between two WGS84 coordinates.
///
/// `x` is longitude and `y` is latitude, both in degrees.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cvrp_core::haversine_meters;
///
/// let paris = Coord { x: 2.3522, y: 48.8566 };
/// let london = Coord { x: -0.1276, y: 51.5072 };
/// let d = haversine_meters(paris, london);
/// assert!((d - 343_556.0).abs() < 1_000.0);
/// assert_eq!(haversine_meters(paris, paris), 0.0);
/// ```
pub fn haversine_meters(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let half_dlat = (to.y - from.y).to_radians() / 2.0;
    let half_dlon = (to.x - from.x).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    // Rounding can push `a` a hair above one for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    c * EARTH_RADIUS_KM * 1000.0
}

/// Symmetric, I/O-free [`DistanceProvider`] using [`haversine_meters`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        Ok(haversine_meters(from, to))
    }
}
