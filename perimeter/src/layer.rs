use crate::PerimeterError;
use projection::Crs;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Integer year of the event, present on every layer.
pub const YEAR_FIELD: &str = "YEAR_";

/// GIS-calculated area in acres, present on every layer.
pub const ACRES_FIELD: &str = "GIS_ACRES";

/// The layers published in the CAL FIRE fire perimeter geodatabase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Layer {
    /// Wildfire perimeters, `firep24_1`.
    Wildfire,

    /// Prescribed burn perimeters, `rxburn24_1`.
    PrescribedBurn,
}

impl Layer {
    pub const ALL: [Self; 2] = [Self::Wildfire, Self::PrescribedBurn];

    /// Returns the layer's name inside the geodatabase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wildfire => "firep24_1",
            Self::PrescribedBurn => "rxburn24_1",
        }
    }

    /// The projection the layer is published in.
    pub fn native_crs(&self) -> Crs {
        Crs::CALIFORNIA_ALBERS
    }

    /// Attribute holding the incident or treatment name.
    pub fn name_field(&self) -> &'static str {
        match self {
            Self::Wildfire => "FIRE_NAME",
            Self::PrescribedBurn => "TREATMENT_NAME",
        }
    }

    /// Attribute holding the date the event started.
    pub fn date_field(&self) -> &'static str {
        match self {
            Self::Wildfire => "ALARM_DATE",
            Self::PrescribedBurn => "START_DATE",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Layer> for &'static str {
    fn from(layer: Layer) -> Self {
        layer.name()
    }
}

impl FromStr for Layer {
    type Err = PerimeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PerimeterError::LayerNotFound {
                layer: s.to_owned(),
                path: None,
            })
    }
}
