use crate::{FirePerimeterRecord, Layer, PerimeterError, YearPredicate};
use geo::{BoundingRect, Rect};
use log::debug;
use projection::{Crs, Transformer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// An ordered set of perimeters from one layer, all in one CRS.
///
/// Collections are never modified after construction. Filtering and
/// reprojecting return new collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PerimeterCollection {
    layer: Layer,
    crs: Crs,

    /// Attribute names of the source layer.
    fields: Vec<String>,

    records: Vec<FirePerimeterRecord>,
}

/// Per-year totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearSummary {
    pub count: usize,

    /// Sum of `GIS_ACRES`, skipping records without it.
    pub acres: f64,
}

/// A description of a loaded layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub layer: Layer,
    pub crs: Crs,
    pub records: usize,
    pub fields: Vec<String>,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// `[min_x, min_y, max_x, max_y]` in `crs` units.
    pub bounds: Option<[f64; 4]>,
}

impl PerimeterCollection {
    pub fn new(
        layer: Layer,
        crs: Crs,
        fields: Vec<String>,
        records: Vec<FirePerimeterRecord>,
    ) -> Self {
        Self {
            layer,
            crs,
            fields,
            records,
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[FirePerimeterRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FirePerimeterRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records whose year satisfies `predicate`, in their
    /// original order.
    pub fn filter_by_year(&self, predicate: YearPredicate) -> Result<Self, PerimeterError> {
        predicate.validate()?;
        let records: Vec<FirePerimeterRecord> = self
            .records
            .iter()
            .filter(|record| predicate.matches(record.year))
            .cloned()
            .collect();
        debug!(
            "{}: {predicate} kept {} of {} records",
            self.layer,
            records.len(),
            self.records.len()
        );
        Ok(self.derive(self.crs, records))
    }

    /// Returns a copy of this collection with every geometry
    /// transformed to `target`.
    pub fn reproject(&self, target: Crs) -> Result<Self, PerimeterError> {
        let transformer = Transformer::new(self.crs, target)?;
        if transformer.is_identity() {
            return Ok(self.clone());
        }

        let now = std::time::Instant::now();
        let records = self
            .records
            .iter()
            .map(|record| -> Result<FirePerimeterRecord, PerimeterError> {
                Ok(FirePerimeterRecord {
                    geometry: transformer.transform_geometry(&record.geometry)?,
                    ..record.clone()
                })
            })
            .collect::<Result<Vec<_>, PerimeterError>>()?;
        debug!(
            "{}: reprojected {} records {} -> {target} in {:?}",
            self.layer,
            records.len(),
            self.crs,
            now.elapsed()
        );
        Ok(self.derive(target, records))
    }

    /// Returns the distinct years present.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|record| record.year).collect()
    }

    /// Returns the earliest and latest year present.
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    /// Returns the bounding rectangle of all perimeters.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.records
            .iter()
            .filter_map(|record| record.geometry.bounding_rect())
            .reduce(|acc, rect| {
                Rect::new(
                    (acc.min().x.min(rect.min().x), acc.min().y.min(rect.min().y)),
                    (acc.max().x.max(rect.max().x), acc.max().y.max(rect.max().y)),
                )
            })
    }

    /// Returns record counts and acreage keyed by year.
    pub fn summary_by_year(&self) -> BTreeMap<i32, YearSummary> {
        let mut summary: BTreeMap<i32, YearSummary> = BTreeMap::new();
        for record in &self.records {
            let entry = summary.entry(record.year).or_default();
            entry.count += 1;
            entry.acres += record.acres.unwrap_or(0.0);
        }
        summary
    }

    pub fn describe(&self) -> LayerInfo {
        let extent = self.year_extent();
        LayerInfo {
            layer: self.layer,
            crs: self.crs,
            records: self.records.len(),
            fields: self.fields.clone(),
            first_year: extent.map(|(first, _)| first),
            last_year: extent.map(|(_, last)| last),
            bounds: self.bounds().map(|rect| {
                let (min, max) = (rect.min(), rect.max());
                [min.x, min.y, max.x, max.y]
            }),
        }
    }

    fn derive(&self, crs: Crs, records: Vec<FirePerimeterRecord>) -> Self {
        Self {
            layer: self.layer,
            crs,
            fields: self.fields.clone(),
            records,
        }
    }
}

impl<'a> IntoIterator for &'a PerimeterCollection {
    type Item = &'a FirePerimeterRecord;
    type IntoIter = std::slice::Iter<'a, FirePerimeterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{PerimeterCollection, YearSummary};
    use crate::{FirePerimeterRecord, Layer, PerimeterError, YearPredicate};
    use approx::assert_abs_diff_eq;
    use geo::{polygon, MultiPolygon, Validation};
    use projection::Crs;
    use std::collections::BTreeSet;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    fn record(fid: i64, year: i32, acres: Option<f64>) -> FirePerimeterRecord {
        #[allow(clippy::cast_precision_loss)]
        let offset = fid as f64 * 20_000.0;
        FirePerimeterRecord {
            fid,
            year,
            incident_name: Some(format!("FIRE {fid}")),
            acres,
            discovery_date: None,
            geometry: square(-150_000.0 + offset, -50_000.0, 5_000.0),
        }
    }

    fn collection() -> PerimeterCollection {
        PerimeterCollection::new(
            Layer::Wildfire,
            Crs::CALIFORNIA_ALBERS,
            vec!["YEAR_".into(), "GIS_ACRES".into()],
            vec![
                record(1, 2020, Some(100.0)),
                record(2, 1987, Some(50.0)),
                record(3, 2020, None),
                record(4, 2012, Some(12.5)),
                record(5, 2024, Some(3.0)),
            ],
        )
    }

    fn fids(collection: &PerimeterCollection) -> Vec<i64> {
        collection.iter().map(|record| record.fid).collect()
    }

    #[test]
    fn test_filter_preserves_order_and_crs() {
        let recent = collection()
            .filter_by_year(YearPredicate::at_least(2010))
            .unwrap();
        assert_eq!(fids(&recent), vec![1, 3, 4, 5]);
        assert_eq!(recent.crs(), Crs::CALIFORNIA_ALBERS);
        assert_eq!(recent.layer(), Layer::Wildfire);
        assert!(recent.iter().all(|record| record.year >= 2010));
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let future = collection()
            .filter_by_year(YearPredicate::equals(2025))
            .unwrap();
        assert!(future.is_empty());
        assert_eq!(future.year_extent(), None);
        assert_eq!(future.bounds(), None);

        let empty = future.filter_by_year(YearPredicate::at_least(0)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_filter_inverted_range() {
        assert!(matches!(
            collection().filter_by_year(YearPredicate::Range(2024, 2010)),
            Err(PerimeterError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_filter_partitions_by_year() {
        let all = collection();
        let mut union: BTreeSet<i64> = BTreeSet::new();
        let mut total = 0;
        for year in all.years() {
            let part = all.filter_by_year(YearPredicate::equals(year)).unwrap();
            assert!(part.iter().all(|record| record.year == year));
            total += part.len();
            union.extend(fids(&part));
        }
        assert_eq!(total, all.len());
        assert_eq!(union, fids(&all).into_iter().collect());
    }

    #[test]
    fn test_filter_idempotent() {
        for predicate in [
            YearPredicate::equals(2020),
            YearPredicate::at_least(2012),
            YearPredicate::range(1980, 2015).unwrap(),
        ] {
            let once = collection().filter_by_year(predicate).unwrap();
            let twice = once.filter_by_year(predicate).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_reproject_composes() {
        let all = collection();
        let direct = all.reproject(Crs::WEB_MERCATOR).unwrap();
        let chained = all
            .reproject(Crs::WGS84)
            .unwrap()
            .reproject(Crs::WEB_MERCATOR)
            .unwrap();
        assert_eq!(direct.crs(), Crs::WEB_MERCATOR);
        assert_eq!(chained.crs(), Crs::WEB_MERCATOR);
        assert_eq!(fids(&direct), fids(&chained));
        for (a, b) in direct.iter().zip(chained.iter()) {
            for (ca, cb) in a.geometry.0[0]
                .exterior()
                .coords()
                .zip(b.geometry.0[0].exterior().coords())
            {
                assert_abs_diff_eq!(ca.x, cb.x, epsilon = 1e-6);
                assert_abs_diff_eq!(ca.y, cb.y, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_reproject_roundtrip_keeps_validity() {
        let all = collection();
        let back = all
            .reproject(Crs::WGS84)
            .unwrap()
            .reproject(Crs::CALIFORNIA_ALBERS)
            .unwrap();
        for (a, b) in all.iter().zip(back.iter()) {
            assert!(b.geometry.is_valid());
            assert_eq!(a.year, b.year);
            for (ca, cb) in a.geometry.0[0]
                .exterior()
                .coords()
                .zip(b.geometry.0[0].exterior().coords())
            {
                assert_abs_diff_eq!(ca.x, cb.x, epsilon = 1e-4);
                assert_abs_diff_eq!(ca.y, cb.y, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_reproject_same_crs() {
        let all = collection();
        assert_eq!(all.reproject(Crs::CALIFORNIA_ALBERS).unwrap(), all);
    }

    #[test]
    fn test_reproject_unsupported() {
        assert!(matches!(
            collection().reproject(Crs::epsg(2154)),
            Err(PerimeterError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn test_summary_by_year() {
        let summary = collection().summary_by_year();
        assert_eq!(summary.len(), 4);
        assert_eq!(
            summary[&2020],
            YearSummary {
                count: 2,
                acres: 100.0
            }
        );
        assert_eq!(summary[&1987].count, 1);
    }

    #[test]
    fn test_describe() {
        let info = collection().describe();
        assert_eq!(info.records, 5);
        assert_eq!(info.first_year, Some(1987));
        assert_eq!(info.last_year, Some(2024));
        let [min_x, min_y, max_x, max_y] = info.bounds.unwrap();
        assert_abs_diff_eq!(min_x, -130_000.0);
        assert_abs_diff_eq!(min_y, -50_000.0);
        assert_abs_diff_eq!(max_x, -45_000.0);
        assert_abs_diff_eq!(max_y, -45_000.0);
    }
}
