//! Reading layers from disk.
//!
//! Two containers are understood:
//!
//! - an ESRI File Geodatabase, a directory named `*.gdb`, read
//!   through GDAL when built with the `gdal` feature
//! - any other directory holding one `<layer>.geojson` file per layer

#[cfg(feature = "gdal")]
mod gdal;
mod geojson;

use crate::{
    layer::{ACRES_FIELD, YEAR_FIELD},
    FirePerimeterRecord, Layer, PerimeterCollection, PerimeterError,
};
use chrono::{DateTime, NaiveDate};
use geo::{Geometry, MultiPolygon, Validation};
use log::{debug, warn};
use projection::Crs;
use std::{collections::HashMap, ffi::OsStr, path::Path};

/// An attribute value as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

/// A feature before validation.
#[derive(Debug, Clone)]
pub(crate) struct RawFeature {
    pub fid: i64,
    pub properties: HashMap<String, Value>,
    pub geometry: Option<Geometry<f64>>,
}

/// A layer's contents before validation.
#[derive(Debug)]
pub(crate) struct RawLayer {
    pub crs: Crs,
    pub fields: Vec<String>,
    pub features: Vec<RawFeature>,
}

/// Loads `layer_name` from the container at `source_path`.
///
/// Records without a year, without a geometry, or with an invalid
/// geometry are dropped with a warning. Features missing the `YEAR_`
/// attribute entirely, or carrying non-polygonal geometries, fail the
/// whole load.
pub fn load<P: AsRef<Path>>(
    source_path: P,
    layer_name: &str,
) -> Result<PerimeterCollection, PerimeterError> {
    let path = source_path.as_ref();
    let not_found = || PerimeterError::LayerNotFound {
        layer: layer_name.to_owned(),
        path: Some(path.to_owned()),
    };
    let layer: Layer = layer_name.parse().map_err(|_| not_found())?;

    let metadata = std::fs::metadata(path).map_err(|e| PerimeterError::unavailable(path, e))?;
    let now = std::time::Instant::now();

    let raw = if metadata.is_dir() && path.extension() == Some(OsStr::new("gdb")) {
        read_geodatabase(path, layer)?
    } else if metadata.is_dir() {
        let file = path.join(format!("{}.geojson", layer.name()));
        if !file.is_file() {
            return Err(not_found());
        }
        geojson::read_layer(&file)?
    } else if is_geojson(path) {
        if path.file_stem() != Some(OsStr::new(layer.name())) {
            return Err(not_found());
        }
        geojson::read_layer(path)?
    } else {
        return Err(PerimeterError::unavailable(
            path,
            "not a geodatabase or GeoJSON container",
        ));
    };

    let collection = build(layer, raw)?;
    debug!(
        "loaded {} records from {layer} in {} in {:?}",
        collection.len(),
        path.display(),
        now.elapsed()
    );
    Ok(collection)
}

/// Loads a single GeoJSON file, such as a previously exported
/// extract, as `layer`.
pub fn load_geojson<P: AsRef<Path>>(
    path: P,
    layer: Layer,
) -> Result<PerimeterCollection, PerimeterError> {
    let raw = geojson::read_layer(path.as_ref())?;
    build(layer, raw)
}

fn is_geojson(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("geojson" | "json")
    )
}

#[cfg(feature = "gdal")]
fn read_geodatabase(path: &Path, layer: Layer) -> Result<RawLayer, PerimeterError> {
    gdal::read_layer(path, layer)
}

#[cfg(not(feature = "gdal"))]
fn read_geodatabase(path: &Path, _layer: Layer) -> Result<RawLayer, PerimeterError> {
    Err(PerimeterError::unavailable(
        path,
        "reading a File Geodatabase requires the `gdal` feature",
    ))
}

/// Validates raw features into a collection.
fn build(layer: Layer, raw: RawLayer) -> Result<PerimeterCollection, PerimeterError> {
    let RawLayer {
        crs,
        fields,
        features,
    } = raw;

    if crs != layer.native_crs() {
        debug!("{layer} is in {crs}, expected {}", layer.native_crs());
    }

    let total = features.len();
    let (mut no_year, mut no_geometry, mut invalid) = (0_usize, 0_usize, 0_usize);
    let mut records = Vec::with_capacity(total);

    for feature in features {
        let year = match feature.properties.get(YEAR_FIELD) {
            None => {
                return Err(PerimeterError::Schema(format!(
                    "feature {} has no {YEAR_FIELD} attribute",
                    feature.fid
                )))
            }
            Some(value) => parse_year(value, feature.fid)?,
        };

        let geometry = match feature.geometry.map(polygonal).transpose() {
            Err(kind) => {
                return Err(PerimeterError::Schema(format!(
                    "feature {} has a {kind} geometry, expected polygons",
                    feature.fid
                )))
            }
            Ok(geometry) => {
                geometry.filter(|mp| mp.iter().any(|p| !p.exterior().0.is_empty()))
            }
        };

        let (Some(year), Some(geometry)) = (year, geometry) else {
            if year.is_none() {
                no_year += 1;
            } else {
                no_geometry += 1;
            }
            continue;
        };

        if !geometry.is_valid() {
            invalid += 1;
            continue;
        }

        let props = &feature.properties;
        records.push(FirePerimeterRecord {
            fid: feature.fid,
            year,
            incident_name: props.get(layer.name_field()).and_then(text),
            acres: props.get(ACRES_FIELD).and_then(float),
            discovery_date: props.get(layer.date_field()).and_then(date),
            geometry,
        });
    }

    let dropped = no_year + no_geometry + invalid;
    if dropped > 0 {
        warn!(
            "{layer}: dropped {dropped} of {total} records \
             ({no_year} without year, {no_geometry} without geometry, {invalid} invalid geometry)"
        );
    }

    Ok(PerimeterCollection::new(layer, crs, fields, records))
}

/// Promotes a polygon to a multipolygon, returning the geometry's
/// type name for anything else.
fn polygonal(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>, &'static str> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Point(_) => Err("Point"),
        Geometry::Line(_) => Err("Line"),
        Geometry::LineString(_) => Err("LineString"),
        Geometry::MultiPoint(_) => Err("MultiPoint"),
        Geometry::MultiLineString(_) => Err("MultiLineString"),
        Geometry::GeometryCollection(_) => Err("GeometryCollection"),
        Geometry::Rect(_) => Err("Rect"),
        Geometry::Triangle(_) => Err("Triangle"),
    }
}

fn parse_year(value: &Value, fid: i64) -> Result<Option<i32>, PerimeterError> {
    let mk_err = || PerimeterError::Schema(format!("feature {fid} has a non-integer {YEAR_FIELD}"));
    match value {
        Value::Null => Ok(None),
        Value::Int(y) => i32::try_from(*y).map(Some).map_err(|_| mk_err()),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(y) if y.fract() == 0.0 => Ok(Some(*y as i32)),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => s.trim().parse().map(Some).map_err(|_| mk_err()),
        Value::Float(_) | Value::Date(_) => Err(mk_err()),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        #[allow(clippy::cast_precision_loss)]
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts ISO dates with or without a time part, `YYYY/MM/DD`
/// variants, and epoch milliseconds.
fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Int(millis) => DateTime::from_timestamp_millis(*millis).map(|dt| dt.date_naive()),
        Value::Text(s) => {
            let day = s.trim().get(..10)?.replace('/', "-");
            NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()
        }
        _ => None,
    }
}
