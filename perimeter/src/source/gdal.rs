use super::{RawFeature, RawLayer, Value};
use crate::{Layer, PerimeterError};
use gdal::{
    vector::{FieldValue, LayerAccess},
    Dataset,
};
use log::warn;
use projection::Crs;
use std::{collections::HashMap, path::Path};

/// Reads `layer` from a File Geodatabase with GDAL's OpenFileGDB
/// driver.
pub(crate) fn read_layer(path: &Path, layer: Layer) -> Result<RawLayer, PerimeterError> {
    let dataset = Dataset::open(path).map_err(|e| PerimeterError::unavailable(path, e))?;
    let mut gdal_layer =
        dataset
            .layer_by_name(layer.name())
            .map_err(|_| PerimeterError::LayerNotFound {
                layer: layer.name().to_owned(),
                path: Some(path.to_owned()),
            })?;

    let crs = {
        let srs = gdal_layer.spatial_ref().ok_or_else(|| {
            PerimeterError::Schema(format!("{layer} has no spatial reference"))
        })?;
        let code = srs
            .auth_code()
            .map_err(|e| PerimeterError::Schema(format!("{layer} spatial reference: {e}")))?;
        let code = u32::try_from(code)
            .map_err(|_| PerimeterError::Schema(format!("{layer} has EPSG code {code}")))?;
        Crs::epsg(code)
    };

    let fields: Vec<String> = gdal_layer.defn().fields().map(|field| field.name()).collect();

    let mut features = Vec::new();
    let mut unconvertible = 0_usize;
    for (idx, feature) in gdal_layer.features().enumerate() {
        #[allow(clippy::cast_possible_wrap)]
        let fid = feature.fid().map_or(idx as i64, |fid| fid as i64);

        let properties: HashMap<String, Value> = feature
            .fields()
            .map(|(name, value)| (name, value.map_or(Value::Null, Value::from)))
            .collect();

        // Curved geometries (MultiSurface, CurvePolygon) have no geo
        // equivalent; they go through as missing and are dropped.
        let geometry = match feature.geometry().map(|geometry| geometry.to_geo()) {
            Some(Ok(geometry)) => Some(geometry),
            Some(Err(_)) => {
                unconvertible += 1;
                None
            }
            None => None,
        };

        features.push(RawFeature {
            fid,
            properties,
            geometry,
        });
    }

    if unconvertible > 0 {
        warn!("{layer}: {unconvertible} geometries could not be converted");
    }

    Ok(RawLayer {
        crs,
        fields,
        features,
    })
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::IntegerValue(i) => Self::Int(i64::from(i)),
            FieldValue::Integer64Value(i) => Self::Int(i),
            FieldValue::RealValue(f) => Self::Float(f),
            FieldValue::StringValue(s) => Self::Text(s),
            FieldValue::DateValue(d) => Self::Date(d),
            FieldValue::DateTimeValue(dt) => Self::Date(dt.date_naive()),
            _ => Self::Null,
        }
    }
}
