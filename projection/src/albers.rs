//! Albers equal-area conic projection on an ellipsoid.
//!
//! # References
//!
//! 1. Snyder, J. P., [Map Projections: A Working Manual](https://pubs.usgs.gov/pp/1395/report.pdf), pp. 98-103
//! 1. [EPSG:3310](https://epsg.io/3310), NAD83 / California Albers

use crate::Ellipsoid;
use geo::Coord;
use std::f64::consts::{FRAC_PI_2, PI};

/// Maximum iterations when solving for latitude in the inverse.
const MAX_ITERATIONS: usize = 15;

/// Latitude convergence threshold, in radians.
const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbersEqualArea {
    a: f64,
    e: f64,
    e2: f64,

    /// Central meridian, radians.
    lon_0: f64,

    false_easting: f64,
    false_northing: f64,

    /// Cone constant.
    n: f64,

    /// Snyder's `C`.
    c: f64,

    /// Radius of the parallel of origin.
    rho_0: f64,
}

impl AlbersEqualArea {
    /// Returns a projection with the given parameters, all angles in
    /// degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ellipsoid: Ellipsoid,
        lat_0: f64,
        lon_0: f64,
        lat_1: f64,
        lat_2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.a;
        let e2 = ellipsoid.e2();
        let e = e2.sqrt();

        let (phi_0, phi_1, phi_2) = (lat_0.to_radians(), lat_1.to_radians(), lat_2.to_radians());

        let m_1 = m(phi_1, e2);
        let m_2 = m(phi_2, e2);
        let q_0 = q(phi_0, e, e2);
        let q_1 = q(phi_1, e, e2);
        let q_2 = q(phi_2, e, e2);

        let n = if (phi_1 - phi_2).abs() < EPSILON {
            phi_1.sin()
        } else {
            (m_1 * m_1 - m_2 * m_2) / (q_2 - q_1)
        };
        let c = m_1 * m_1 + n * q_1;
        let rho_0 = a * (c - n * q_0).sqrt() / n;

        Self {
            a,
            e,
            e2,
            lon_0: lon_0.to_radians(),
            false_easting,
            false_northing,
            n,
            c,
            rho_0,
        }
    }

    /// NAD83 / California Albers (EPSG:3310).
    pub fn california() -> Self {
        Self::new(Ellipsoid::GRS80, 0.0, -120.0, 34.0, 40.5, 0.0, -4_000_000.0)
    }

    /// Projects a `(lon, lat)` coordinate in degrees to meters.
    pub fn forward(&self, Coord { x: lon, y: lat }: Coord<f64>) -> Coord<f64> {
        let phi = lat.to_radians();
        let rho = self.a * (self.c - self.n * q(phi, self.e, self.e2)).sqrt() / self.n;
        let theta = self.n * wrap_pi(lon.to_radians() - self.lon_0);
        Coord {
            x: self.false_easting + rho * theta.sin(),
            y: self.false_northing + self.rho_0 - rho * theta.cos(),
        }
    }

    /// Unprojects a coordinate in meters to `(lon, lat)` in degrees.
    pub fn inverse(&self, Coord { x, y }: Coord<f64>) -> Coord<f64> {
        let x = x - self.false_easting;
        let rho_0_y = self.rho_0 - (y - self.false_northing);

        let (rho, theta) = if self.n >= 0.0 {
            (x.hypot(rho_0_y), x.atan2(rho_0_y))
        } else {
            (-x.hypot(rho_0_y), (-x).atan2(-rho_0_y))
        };

        let q = (self.c - (rho * self.n / self.a).powi(2)) / self.n;
        let phi = self.phi_from_q(q);
        let lambda = wrap_pi(self.lon_0 + theta / self.n);

        Coord {
            x: lambda.to_degrees(),
            y: phi.to_degrees(),
        }
    }

    /// Solves Snyder eq. 3-16 for latitude by fixed-point iteration.
    fn phi_from_q(&self, q: f64) -> f64 {
        let (e, e2) = (self.e, self.e2);
        let q_pole = 1.0 - (1.0 - e2) / (2.0 * e) * ((1.0 - e) / (1.0 + e)).ln();
        if (q.abs() - q_pole.abs()).abs() < EPSILON || q.abs() > q_pole.abs() {
            return FRAC_PI_2.copysign(q);
        }

        let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
        for _ in 0..MAX_ITERATIONS {
            let sin_phi = phi.sin();
            let one_less = 1.0 - e2 * sin_phi * sin_phi;
            let delta = one_less * one_less / (2.0 * phi.cos())
                * (q / (1.0 - e2) - sin_phi / one_less
                    + 1.0 / (2.0 * e) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln());
            phi += delta;
            if delta.abs() < EPSILON {
                break;
            }
        }
        phi
    }
}

/// Snyder eq. 14-15.
fn m(phi: f64, e2: f64) -> f64 {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - e2 * sin_phi * sin_phi).sqrt()
}

/// Snyder eq. 3-12.
fn q(phi: f64, e: f64, e2: f64) -> f64 {
    let sin_phi = phi.sin();
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
            - 1.0 / (2.0 * e) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
}

/// Wraps an angle in radians to `[-π, π]`.
fn wrap_pi(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}
