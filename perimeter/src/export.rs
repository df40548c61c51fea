//! Writing derived extracts.

use crate::{
    layer::{ACRES_FIELD, YEAR_FIELD},
    PerimeterCollection, PerimeterError,
};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue};
use log::debug;
use serde_json::json;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Writes `collection` to `path` as a GeoJSON FeatureCollection.
///
/// Coordinates stay in the collection's CRS, which is recorded in a
/// named `crs` member so [`crate::load_geojson`] can read the file
/// back. Only the typed record attributes are written.
pub fn write_geojson<P: AsRef<Path>>(
    collection: &PerimeterCollection,
    path: P,
) -> Result<(), PerimeterError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let geojson = to_geojson(collection);
    let mut wtr = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut wtr, &geojson)?;
    wtr.flush()?;

    debug!(
        "wrote {} {} records to {}",
        collection.len(),
        collection.layer(),
        path.display()
    );
    Ok(())
}

/// Converts `collection` into a GeoJSON FeatureCollection.
pub fn to_geojson(collection: &PerimeterCollection) -> GeoJson {
    let layer = collection.layer();
    let features = collection
        .iter()
        .map(|record| {
            let mut properties = JsonObject::new();
            properties.insert(YEAR_FIELD.to_owned(), json!(record.year));
            properties.insert(
                layer.name_field().to_owned(),
                json!(record.incident_name),
            );
            properties.insert(ACRES_FIELD.to_owned(), json!(record.acres));
            properties.insert(
                layer.date_field().to_owned(),
                json!(record
                    .discovery_date
                    .map(|date| date.format("%Y-%m-%d").to_string())),
            );
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&record.geometry))),
                id: Some(Id::Number(record.fid.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "name".to_owned(),
        JsonValue::String(layer.name().to_owned()),
    );
    foreign_members.insert(
        "crs".to_owned(),
        json!({
            "type": "name",
            "properties": {
                "name": format!("urn:ogc:def:crs:EPSG::{}", collection.crs().code())
            }
        }),
    );

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}
