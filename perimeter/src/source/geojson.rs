use super::{RawFeature, RawLayer, Value};
use crate::PerimeterError;
use geojson::{feature::Id, GeoJson, JsonObject, JsonValue};
use projection::Crs;
use std::{
    collections::{BTreeSet, HashMap},
    fs::File,
    io::BufReader,
    path::Path,
};

/// Reads a FeatureCollection.
///
/// The CRS comes from the legacy (2008) named `crs` member that GDAL
/// still writes. Without one the file is RFC 7946 GeoJSON, which is
/// always WGS 84.
pub(crate) fn read_layer(path: &Path) -> Result<RawLayer, PerimeterError> {
    let file = File::open(path).map_err(|e| PerimeterError::unavailable(path, e))?;
    let geojson =
        GeoJson::from_reader(BufReader::new(file)).map_err(|e| PerimeterError::unavailable(path, e))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(PerimeterError::unavailable(path, "not a FeatureCollection")),
    };

    let crs = crs_member(collection.foreign_members.as_ref())?.unwrap_or(Crs::WGS84);
    let mut fields = BTreeSet::new();
    let mut features = Vec::with_capacity(collection.features.len());

    for (idx, feature) in collection.features.into_iter().enumerate() {
        if let Some(found) = crs_member(feature.foreign_members.as_ref())? {
            if found != crs {
                return Err(PerimeterError::MixedCrs {
                    expected: crs,
                    found,
                });
            }
        }

        let properties: HashMap<String, Value> = feature
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        fields.extend(properties.keys().cloned());

        #[allow(clippy::cast_possible_wrap)]
        let fid = match (&feature.id, properties.get("OBJECTID")) {
            (Some(Id::Number(n)), _) if n.is_i64() => n.as_i64(),
            (Some(Id::String(s)), _) if s.parse::<i64>().is_ok() => s.parse().ok(),
            (_, Some(Value::Int(objectid))) => Some(*objectid),
            _ => None,
        }
        .unwrap_or(idx as i64);

        let geometry = feature
            .geometry
            .map(|geometry| geo::Geometry::<f64>::try_from(geometry.value))
            .transpose()
            .map_err(|e| PerimeterError::Schema(format!("feature {fid}: {e}")))?;

        features.push(RawFeature {
            fid,
            properties,
            geometry,
        });
    }

    Ok(RawLayer {
        crs,
        fields: fields.into_iter().collect(),
        features,
    })
}

/// Parses a `crs` member, either `{"type": "name", "properties":
/// {"name": "EPSG:3310"}}` or the older `{"type": "EPSG",
/// "properties": {"code": 3310}}`.
fn crs_member(members: Option<&JsonObject>) -> Result<Option<Crs>, PerimeterError> {
    let Some(crs) = members.and_then(|members| members.get("crs")) else {
        return Ok(None);
    };
    let mk_err = || PerimeterError::Schema(format!("unrecognized crs member {crs}"));
    let properties = crs.get("properties").ok_or_else(mk_err)?;

    if let Some(name) = properties.get("name").and_then(JsonValue::as_str) {
        return name.parse().map(Some).map_err(|_| mk_err());
    }
    if let Some(code) = properties.get("code").and_then(JsonValue::as_u64) {
        return u32::try_from(code)
            .map(|code| Some(Crs::epsg(code)))
            .map_err(|_| mk_err());
    }
    Err(mk_err())
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Int(i64::from(b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            JsonValue::String(s) => Self::Text(s),
            other @ (JsonValue::Array(_) | JsonValue::Object(_)) => Self::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{crs_member, read_layer};
    use crate::{fixtures_dir, source::Value, PerimeterError};
    use projection::Crs;
    use serde_json::json;
    use std::io::Write;

    fn write_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".geojson").tempfile().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    fn square_feature(crs: Option<&str>) -> serde_json::Value {
        let mut feature = json!({
            "type": "Feature",
            "properties": { "YEAR_": 2020 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
            }
        });
        if let Some(name) = crs {
            feature["crs"] = json!({ "type": "name", "properties": { "name": name } });
        }
        feature
    }

    #[test]
    fn test_read_fixture() {
        let raw = read_layer(&fixtures_dir().join("firep24_1.geojson")).unwrap();
        assert_eq!(raw.crs, Crs::CALIFORNIA_ALBERS);
        assert_eq!(raw.features.len(), 10);
        assert!(raw.fields.contains(&"FIRE_NAME".to_owned()));
        let first = &raw.features[0];
        assert_eq!(first.fid, 1);
        assert_eq!(first.properties["YEAR_"], Value::Int(1950));
    }

    #[test]
    fn test_crs_member() {
        let named = json!({ "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3310" } } });
        assert_eq!(
            crs_member(named.as_object()).unwrap(),
            Some(Crs::CALIFORNIA_ALBERS)
        );
        let coded = json!({ "crs": { "type": "EPSG", "properties": { "code": 3857 } } });
        assert_eq!(crs_member(coded.as_object()).unwrap(), Some(Crs::WEB_MERCATOR));
        let absent = json!({});
        assert_eq!(crs_member(absent.as_object()).unwrap(), None);
        let garbage = json!({ "crs": { "type": "name" } });
        assert!(crs_member(garbage.as_object()).is_err());
    }

    #[test]
    fn test_default_wgs84() {
        let file = write_json(&json!({
            "type": "FeatureCollection",
            "features": [square_feature(None)]
        }));
        let raw = read_layer(file.path()).unwrap();
        assert_eq!(raw.crs, Crs::WGS84);
        assert_eq!(raw.features[0].fid, 0);
    }

    #[test]
    fn test_mixed_crs() {
        let file = write_json(&json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "EPSG:3310" } },
            "features": [square_feature(Some("EPSG:3310")), square_feature(Some("EPSG:4326"))]
        }));
        assert!(matches!(
            read_layer(file.path()),
            Err(PerimeterError::MixedCrs {
                expected: Crs::CALIFORNIA_ALBERS,
                found: Crs::WGS84
            })
        ));
    }

    #[test]
    fn test_not_a_collection() {
        let file = write_json(&square_feature(None));
        assert!(matches!(
            read_layer(file.path()),
            Err(PerimeterError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            read_layer(file.path()),
            Err(PerimeterError::SourceUnavailable { .. })
        ));
    }
}
