use crate::{mercator, AlbersEqualArea, ProjectionError};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A coordinate reference system identified by its EPSG code.
///
/// Any code can be named; only the ones [`Crs::projection`] knows how
/// to resolve can be transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Crs(u32);

impl Crs {
    /// NAD83 / California Albers.
    pub const CALIFORNIA_ALBERS: Self = Self(3310);

    /// WGS 84 geographic, longitude/latitude in degrees.
    pub const WGS84: Self = Self(4326);

    /// NAD83 geographic, longitude/latitude in degrees.
    pub const NAD83: Self = Self(4269);

    /// WGS 84 / Pseudo-Mercator.
    pub const WEB_MERCATOR: Self = Self(3857);

    pub const fn epsg(code: u32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    /// Returns the projection backing this CRS.
    pub fn projection(&self) -> Result<Projection, ProjectionError> {
        match self.0 {
            3310 => Ok(Projection::Albers(AlbersEqualArea::california())),
            4326 | 4269 => Ok(Projection::Geographic),
            3857 | 900_913 => Ok(Projection::WebMercator),
            code => Err(ProjectionError::Unsupported(code)),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.projection().is_ok()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Parses `EPSG:3310`, `epsg:3310`, `3310`,
/// `urn:ogc:def:crs:EPSG::3310` and the CRS84 URN.
impl FromStr for Crs {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mk_err = || ProjectionError::Parse(s.to_owned());
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        if upper == "URN:OGC:DEF:CRS:OGC:1.3:CRS84" || upper == "CRS84" {
            return Ok(Self::WGS84);
        }

        let code = if let Some(rest) = upper.strip_prefix("URN:OGC:DEF:CRS:EPSG:") {
            // The version segment between the colons is usually empty.
            rest.rsplit(':').next().ok_or_else(mk_err)?
        } else if let Some(rest) = upper.strip_prefix("EPSG:") {
            rest
        } else {
            upper.as_str()
        };

        code.parse::<u32>().map(Self).map_err(|_| mk_err())
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> String {
        crs.to_string()
    }
}

impl TryFrom<String> for Crs {
    type Error = ProjectionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A resolved projection between geographic degrees and a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Longitude/latitude degrees, no projection.
    Geographic,

    Albers(AlbersEqualArea),

    WebMercator,
}

impl Projection {
    /// Converts a projected coordinate to `(lon, lat)` degrees.
    pub fn to_geographic(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Geographic => coord,
            Self::Albers(albers) => albers.inverse(coord),
            Self::WebMercator => mercator::inverse(coord),
        }
    }

    /// Converts `(lon, lat)` degrees to a projected coordinate.
    pub fn from_geographic(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Self::Geographic => coord,
            Self::Albers(albers) => albers.forward(coord),
            Self::WebMercator => mercator::forward(coord),
        }
    }
}
