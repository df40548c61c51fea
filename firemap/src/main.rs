mod extract;
mod info;
mod options;
mod plot;
mod progress;
mod render;
mod sweep;
mod years;

use anyhow::Result;
use clap::Parser;
use log::info;
use options::{Cli, Command as CliCmd};
use perimeter::{PerimeterCollection, YearPredicate};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();
    let Cli { source, cmd } = Cli::parse();
    match cmd {
        CliCmd::Info(info) => info.run(&source),
        CliCmd::Years(years) => years.run(&source),
        CliCmd::Extract(extract) => extract.run(&source),
        CliCmd::Plot(plot) => plot.run(&source),
        CliCmd::Sweep(sweep) => sweep.run(&source),
    }
}

/// Loads `layer` from `source`, keeping only `years` when given.
fn load_layer(
    source: &Path,
    layer: &str,
    years: Option<YearPredicate>,
) -> Result<PerimeterCollection> {
    let collection = perimeter::load(source, layer)?;
    info!(
        "loaded {} {} records in {}",
        collection.len(),
        collection.layer(),
        collection.crs()
    );
    match years {
        None => Ok(collection),
        Some(predicate) => {
            let filtered = collection.filter_by_year(predicate)?;
            info!("{} records match {predicate}", filtered.len());
            Ok(filtered)
        }
    }
}

#[cfg(test)]
fn fixtures_dir() -> std::path::PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "data", "fixtures", "fire24_1"]
        .iter()
        .collect()
}
