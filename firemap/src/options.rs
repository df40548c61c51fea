use crate::render::{Extent, HexColor};
use clap::{Args, Parser, Subcommand, ValueEnum};
use perimeter::{Crs, YearPredicate};
use std::path::PathBuf;

/// Explore California fire and prescribed-burn perimeters.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File Geodatabase (`.gdb`) or a directory of `<layer>.geojson`
    /// files.
    #[arg(
        short,
        long,
        env = "FIREMAP_SOURCE",
        default_value = "data/raw/fire24_1.gdb"
    )]
    pub source: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Describe a layer: CRS, record count, fields, years and bounds.
    Info(Info),

    /// Per-year perimeter counts and acreage.
    Years(Years),

    /// Write a filtered, optionally reprojected, GeoJSON extract.
    Extract(Extract),

    /// Render perimeters to an SVG or PNG map.
    Plot(Plot),

    /// Render one map per year.
    Sweep(Sweep),
}

#[derive(Debug, Clone, Args)]
pub struct Info {
    /// `firep24_1` (wildfires) or `rxburn24_1` (prescribed burns).
    #[arg(short, long, default_value = "firep24_1")]
    pub layer: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Years {
    #[arg(short, long, default_value = "firep24_1")]
    pub layer: String,

    /// Year filter: `2020`, `2010..` or `2010..2020`.
    #[arg(short, long)]
    pub years: Option<YearPredicate>,

    #[arg(long)]
    pub json: bool,

    /// Plot counts per year to the terminal.
    #[arg(long)]
    pub chart: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Extract {
    #[arg(short, long, default_value = "firep24_1")]
    pub layer: String,

    /// Year filter: `2020`, `2010..` or `2010..2020`.
    #[arg(short, long)]
    pub years: Option<YearPredicate>,

    /// Reproject to this CRS, e.g. `EPSG:4326`.
    #[arg(long)]
    pub crs: Option<Crs>,

    /// Output GeoJSON path.
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Plot {
    #[arg(short, long, default_value = "firep24_1")]
    pub layer: String,

    /// Year filter: `2020`, `2010..` or `2010..2020`.
    #[arg(short, long)]
    pub years: Option<YearPredicate>,

    /// CRS to draw in.
    #[arg(long, default_value_t = Crs::WEB_MERCATOR)]
    pub crs: Crs,

    #[command(flatten)]
    pub style: Style,

    /// Output path, SVG if it ends in `.svg`, otherwise PNG.
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Sweep {
    #[arg(short, long, default_value = "firep24_1")]
    pub layer: String,

    /// First year.
    #[arg(long)]
    pub from: i32,

    /// Last year, inclusive.
    #[arg(long)]
    pub to: i32,

    /// Which perimeters each frame shows.
    #[arg(long, value_enum, default_value_t = SweepMode::Equals)]
    pub mode: SweepMode,

    /// CRS to draw in.
    #[arg(long, default_value_t = Crs::WEB_MERCATOR)]
    pub crs: Crs,

    #[command(flatten)]
    pub style: Style,

    /// Frame file extension, `svg` or `png`.
    #[arg(long, default_value = "png")]
    pub format: String,

    /// Output directory.
    #[arg(short, long)]
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepMode {
    /// Only the frame's year.
    Equals,

    /// The frame's year and everything after it.
    AtLeast,
}

#[derive(Debug, Clone, Args)]
pub struct Style {
    /// Fill and outline color, `#rrggbb`.
    #[arg(long, default_value = "#d62728")]
    pub color: HexColor,

    /// Fill opacity in `[0, 1]`.
    #[arg(long, default_value_t = 0.5)]
    pub opacity: f64,

    /// Map extent "min_lon,min_lat,max_lon,max_lat" in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub extent: Option<Extent>,

    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    #[arg(long, default_value_t = 1024)]
    pub height: u32,

    /// Caption drawn above the map.
    #[arg(long)]
    pub title: Option<String>,

    /// Don't draw axes or labels.
    #[arg(long)]
    pub no_axes: bool,
}
