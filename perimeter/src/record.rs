use chrono::NaiveDate;
use geo::MultiPolygon;

/// One fire or prescribed burn.
#[derive(Debug, Clone, PartialEq)]
pub struct FirePerimeterRecord {
    /// Feature id in the source layer.
    pub fid: i64,

    pub year: i32,

    /// `FIRE_NAME` for wildfires, `TREATMENT_NAME` for burns.
    pub incident_name: Option<String>,

    /// `GIS_ACRES`.
    pub acres: Option<f64>,

    /// `ALARM_DATE` for wildfires, `START_DATE` for burns.
    pub discovery_date: Option<NaiveDate>,

    /// Perimeter, in the owning collection's CRS.
    pub geometry: MultiPolygon<f64>,
}
