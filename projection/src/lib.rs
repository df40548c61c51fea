//! Coordinate reference systems used by California fire perimeter
//! data, and transforms between them.
//!
//! Every transform goes through geographic longitude/latitude, which
//! makes chained transforms compose: `A -> B -> C` lands on the same
//! coordinates as `A -> C` up to floating point error. NAD83 and WGS 84
//! are treated as coincident; the datum shift between them is on the
//! order of a meter in California.

mod albers;
mod crs;
mod ellipsoid;
mod error;
pub mod mercator;

pub use crate::{
    albers::AlbersEqualArea,
    crs::{Crs, Projection},
    ellipsoid::Ellipsoid,
    error::ProjectionError,
};
pub use geo;

use geo::{Coord, MapCoords};

/// Transforms coordinates from one [`Crs`] to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformer {
    source: Projection,
    target: Projection,
    identity: bool,
}

impl Transformer {
    pub fn new(source: Crs, target: Crs) -> Result<Self, ProjectionError> {
        Ok(Self {
            source: source.projection()?,
            target: target.projection()?,
            identity: source == target,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transforms a single coordinate.
    pub fn transform(&self, coord: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        if self.identity {
            return Ok(coord);
        }
        let out = self
            .target
            .from_geographic(self.source.to_geographic(coord));
        if out.x.is_finite() && out.y.is_finite() {
            Ok(out)
        } else {
            Err(ProjectionError::NonFinite(coord.x, coord.y))
        }
    }

    /// Transforms every coordinate of `geometry`.
    pub fn transform_geometry<G>(&self, geometry: &G) -> Result<G::Output, ProjectionError>
    where
        G: MapCoords<f64, f64>,
    {
        geometry.try_map_coords(|coord| self.transform(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::{Crs, ProjectionError, Transformer};
    use approx::assert_abs_diff_eq;
    use geo::{coord, polygon, Area};

    #[test]
    fn test_identity() {
        let transformer = Transformer::new(Crs::CALIFORNIA_ALBERS, Crs::CALIFORNIA_ALBERS).unwrap();
        assert!(transformer.is_identity());
        let c = coord!(x: 1.0, y: 2.0);
        assert_eq!(transformer.transform(c).unwrap(), c);
    }

    #[test]
    fn test_unsupported_target() {
        assert_eq!(
            Transformer::new(Crs::CALIFORNIA_ALBERS, Crs::epsg(32611)),
            Err(ProjectionError::Unsupported(32611))
        );
    }

    #[test]
    fn test_composition() {
        let albers_to_mercator = Transformer::new(Crs::CALIFORNIA_ALBERS, Crs::WEB_MERCATOR).unwrap();
        let albers_to_wgs84 = Transformer::new(Crs::CALIFORNIA_ALBERS, Crs::WGS84).unwrap();
        let wgs84_to_mercator = Transformer::new(Crs::WGS84, Crs::WEB_MERCATOR).unwrap();

        let c = coord!(x: -130_031.426, y: 63_858.194);
        let direct = albers_to_mercator.transform(c).unwrap();
        let chained = wgs84_to_mercator
            .transform(albers_to_wgs84.transform(c).unwrap())
            .unwrap();
        assert_abs_diff_eq!(direct.x, chained.x, epsilon = 1e-6);
        assert_abs_diff_eq!(direct.y, chained.y, epsilon = 1e-6);
    }

    #[test]
    fn test_equal_area_preserved() {
        // A 10 km square in California Albers keeps its area when
        // taken to geographic and back.
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10_000.0, y: 0.0),
            (x: 10_000.0, y: 10_000.0),
            (x: 0.0, y: 10_000.0),
            (x: 0.0, y: 0.0),
        ];
        let to_wgs84 = Transformer::new(Crs::CALIFORNIA_ALBERS, Crs::WGS84).unwrap();
        let from_wgs84 = Transformer::new(Crs::WGS84, Crs::CALIFORNIA_ALBERS).unwrap();
        let roundtrip = from_wgs84
            .transform_geometry(&to_wgs84.transform_geometry(&square).unwrap())
            .unwrap();
        assert_abs_diff_eq!(
            roundtrip.unsigned_area(),
            square.unsigned_area(),
            epsilon = 1e-3
        );
    }
}
