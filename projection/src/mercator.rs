//! Spherical ("pseudo") Mercator used by web map tiles, EPSG:3857.

use geo::Coord;
use std::f64::consts::FRAC_PI_4;

/// Sphere radius, the WGS84 semi-major axis.
pub const RADIUS: f64 = 6_378_137.0;

/// Latitude at which the projected map becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Projects `(lon, lat)` degrees to meters, clamping latitude to
/// [`MAX_LATITUDE`].
pub fn forward(Coord { x: lon, y: lat }: Coord<f64>) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    Coord {
        x: RADIUS * lon.to_radians(),
        y: RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

/// Unprojects meters to `(lon, lat)` degrees.
pub fn inverse(Coord { x, y }: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (x / RADIUS).to_degrees(),
        y: (2.0 * (y / RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::{forward, inverse, MAX_LATITUDE};
    use approx::assert_abs_diff_eq;
    use geo::coord;

    #[test]
    fn test_antimeridian() {
        let projected = forward(coord!(x: 180.0, y: 0.0));
        assert_abs_diff_eq!(projected.x, 20_037_508.342_789_244, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_square_world() {
        let corner = forward(coord!(x: 180.0, y: MAX_LATITUDE));
        assert_abs_diff_eq!(corner.x, corner.y, epsilon = 1e-3);
        let clamped = forward(coord!(x: 180.0, y: 89.9));
        assert_abs_diff_eq!(clamped.y, corner.y, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        let tahoe = coord!(x: -120.0, y: 39.0);
        let projected = forward(tahoe);
        assert_abs_diff_eq!(projected.x, -13_358_338.895, epsilon = 1e-2);
        assert_abs_diff_eq!(projected.y, 4_721_671.573, epsilon = 1e-2);
        let unprojected = inverse(projected);
        assert_abs_diff_eq!(unprojected.x, tahoe.x, epsilon = 1e-9);
        assert_abs_diff_eq!(unprojected.y, tahoe.y, epsilon = 1e-9);
    }
}
