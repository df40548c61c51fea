/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters.
    pub a: f64,

    /// Inverse flattening.
    pub rf: f64,
}

impl Ellipsoid {
    /// Geodetic Reference System 1980, used by NAD83.
    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        rf: 298.257_222_101,
    };

    /// World Geodetic System 1984.
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        rf: 298.257_223_563,
    };

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        let f = 1.0 / self.rf;
        2.0 * f - f * f
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }
}
