//! California fire and prescribed-burn perimeters.
//!
//! Loads the `firep24_1` and `rxburn24_1` layers of the CAL FIRE
//! perimeter geodatabase into typed, immutable collections that can be
//! filtered by year, reprojected, summarized and exported.
//!
//! ```no_run
//! use perimeter::{YearPredicate, Crs};
//!
//! let fires = perimeter::load("data/raw/fire24_1.gdb", "firep24_1")?;
//! let recent = fires
//!     .filter_by_year(YearPredicate::at_least(2010))?
//!     .reproject(Crs::WEB_MERCATOR)?;
//! println!("{} fires since 2010", recent.len());
//! # Ok::<(), perimeter::PerimeterError>(())
//! ```

mod collection;
mod error;
pub mod export;
mod filter;
pub mod layer;
mod record;
mod source;

pub use crate::{
    collection::{LayerInfo, PerimeterCollection, YearSummary},
    error::PerimeterError,
    filter::YearPredicate,
    layer::Layer,
    record::FirePerimeterRecord,
    source::{load, load_geojson},
};
pub use projection::{self, Crs};

#[cfg(test)]
fn fixtures_dir() -> std::path::PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "data", "fixtures", "fire24_1"]
        .iter()
        .collect()
}
