//! Draw perimeter collections with plotters.

use anyhow::{anyhow, Error as AnyError, Result};
use geo::{coord, Rect};
use perimeter::{projection::Transformer, Crs, PerimeterCollection};
use plotters::{coord::Shift, prelude::*};
use std::{ffi::OsStr, path::Path, str::FromStr};

/// Lon/lat box shown when there is nothing to fit the map to.
const CALIFORNIA: Extent = Extent {
    min_lon: -124.5,
    min_lat: 32.5,
    max_lon: -114.0,
    max_lat: 42.1,
};

/// Fractional padding added around data bounds.
const PADDING: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub color: RGBColor,

    /// Fill opacity, clamped to `[0, 1]`.
    pub opacity: f64,

    /// Visible area in the collection's CRS. Fit to the data when
    /// `None`.
    pub extent: Option<Rect<f64>>,

    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub axes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: RGBColor(0xd6, 0x27, 0x28),
            opacity: 0.5,
            extent: None,
            width: 1024,
            height: 1024,
            title: None,
            axes: true,
        }
    }
}

/// Renders `collection` to `out`, as SVG when the extension is `svg`
/// and PNG otherwise.
pub fn render(collection: &PerimeterCollection, options: &RenderOptions, out: &Path) -> Result<()> {
    let extent = match options.extent {
        Some(extent) => extent,
        None => fit_extent(collection)?,
    };
    let size = (options.width, options.height);
    if out.extension() == Some(OsStr::new("svg")) {
        draw(
            SVGBackend::new(out, size).into_drawing_area(),
            collection,
            options,
            extent,
        )
    } else {
        draw(
            BitMapBackend::new(out, size).into_drawing_area(),
            collection,
            options,
            extent,
        )
    }
}

/// Returns the padded bounds of `collection`, or California when it
/// is empty.
pub fn fit_extent(collection: &PerimeterCollection) -> Result<Rect<f64>> {
    let Some(bounds) = collection.bounds() else {
        return CALIFORNIA.to_rect(collection.crs());
    };
    let pad_x = (bounds.width() * PADDING).max(1.0);
    let pad_y = (bounds.height() * PADDING).max(1.0);
    Ok(Rect::new(
        coord!(x: bounds.min().x - pad_x, y: bounds.min().y - pad_y),
        coord!(x: bounds.max().x + pad_x, y: bounds.max().y + pad_y),
    ))
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    collection: &PerimeterCollection,
    options: &RenderOptions,
    extent: Rect<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if let Some(title) = &options.title {
        builder.caption(title, ("sans-serif", 24));
    }
    if options.axes {
        builder.x_label_area_size(40).y_label_area_size(80);
    }
    let (min, max) = (extent.min(), extent.max());
    let mut chart = builder.build_cartesian_2d(min.x..max.x, min.y..max.y)?;

    if options.axes {
        let crs = collection.crs().to_string();
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("x ({crs})"))
            .y_desc(format!("y ({crs})"))
            .draw()?;
    }

    let fill = options.color.mix(options.opacity.clamp(0.0, 1.0)).filled();
    let stroke = options.color.stroke_width(1);

    // Holes are outlined but not cut out of the fill.
    for record in collection {
        for polygon in record.geometry.iter() {
            let exterior: Vec<(f64, f64)> =
                polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
            chart.draw_series(std::iter::once(Polygon::new(exterior.clone(), fill)))?;
            chart.draw_series(std::iter::once(PathElement::new(exterior, stroke)))?;
            for interior in polygon.interiors() {
                let ring: Vec<(f64, f64)> = interior.coords().map(|c| (c.x, c.y)).collect();
                chart.draw_series(std::iter::once(PathElement::new(ring, stroke)))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

/// A `#rrggbb` color argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub RGBColor);

impl FromStr for HexColor {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, AnyError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(anyhow!("not a #rrggbb color: {s}"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Self(RGBColor(channel(0)?, channel(2)?, channel(4)?)))
    }
}

/// A lon/lat bounding box, "min_lon,min_lat,max_lon,max_lat".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    /// Projects this box into `crs`, returning the rectangle that
    /// contains all four projected corners.
    pub fn to_rect(&self, crs: Crs) -> Result<Rect<f64>> {
        let transformer = Transformer::new(Crs::WGS84, crs)?;
        let first = transformer.transform(coord!(x: self.min_lon, y: self.min_lat))?;
        let (mut min, mut max) = (first, first);
        for corner in [
            coord!(x: self.max_lon, y: self.min_lat),
            coord!(x: self.max_lon, y: self.max_lat),
            coord!(x: self.min_lon, y: self.max_lat),
        ] {
            let c = transformer.transform(corner)?;
            min = coord!(x: min.x.min(c.x), y: min.y.min(c.y));
            max = coord!(x: max.x.max(c.x), y: max.y.max(c.y));
        }
        Ok(Rect::new(min, max))
    }
}

impl FromStr for Extent {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, AnyError> {
        let parts = s
            .split(',')
            .map(|part| f64::from_str(part.trim()))
            .collect::<Result<Vec<f64>, _>>()?;
        let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
            return Err(anyhow!("not a valid min_lon,min_lat,max_lon,max_lat box"));
        };
        if min_lon >= max_lon || min_lat >= max_lat {
            return Err(anyhow!("empty extent {s}"));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{fit_extent, render, Extent, HexColor, RenderOptions};
    use crate::fixtures_dir;
    use perimeter::{Crs, YearPredicate};
    use plotters::style::RGBColor;

    fn quiet() -> RenderOptions {
        RenderOptions {
            axes: false,
            width: 256,
            height: 256,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            "#ff8000".parse::<HexColor>().unwrap(),
            HexColor(RGBColor(255, 128, 0))
        );
        assert_eq!(
            "1f77b4".parse::<HexColor>().unwrap(),
            HexColor(RGBColor(0x1f, 0x77, 0xb4))
        );
        assert!("#fff".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_parse_extent() {
        let extent: Extent = "-124.5,32.5,-114,42.1".parse().unwrap();
        assert_eq!(extent.min_lon, -124.5);
        assert_eq!(extent.max_lat, 42.1);
        assert!("-114,32.5,-124.5,42.1".parse::<Extent>().is_err());
        assert!("1,2,3".parse::<Extent>().is_err());
    }

    #[test]
    fn test_extent_to_rect() {
        let extent: Extent = "-124.5,32.5,-114,42.1".parse().unwrap();
        let rect = extent.to_rect(Crs::WGS84).unwrap();
        assert_eq!(rect.min().x, -124.5);
        assert_eq!(rect.max().y, 42.1);

        let albers = extent.to_rect(Crs::CALIFORNIA_ALBERS).unwrap();
        assert!(albers.min().x < -300_000.0 && albers.max().x > 500_000.0);
        assert!(extent.to_rect(Crs::epsg(2154)).is_err());
    }

    #[test]
    fn test_fit_extent_contains_data() {
        let fires = perimeter::load(fixtures_dir(), "firep24_1").unwrap();
        let bounds = fires.bounds().unwrap();
        let extent = fit_extent(&fires).unwrap();
        assert!(extent.min().x < bounds.min().x && extent.max().x > bounds.max().x);
        assert!(extent.min().y < bounds.min().y && extent.max().y > bounds.max().y);
    }

    #[test]
    fn test_render_svg() {
        let fires = perimeter::load(fixtures_dir(), "firep24_1")
            .unwrap()
            .reproject(Crs::WEB_MERCATOR)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fires.svg");
        render(&fires, &quiet(), &out).unwrap();
        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_render_empty_png() {
        let none = perimeter::load(fixtures_dir(), "firep24_1")
            .unwrap()
            .filter_by_year(YearPredicate::equals(2025))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("none.png");
        render(&none, &quiet(), &out).unwrap();
        assert!(out.is_file());
    }
}
