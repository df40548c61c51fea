use crate::options::Info;
use anyhow::Result;
use perimeter::LayerInfo;
use std::{
    io::{self, Write},
    path::Path,
};

impl Info {
    pub fn run(&self, source: &Path) -> Result<()> {
        let info = crate::load_layer(source, &self.layer, None)?.describe();
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, &info)?;
            writeln!(stdout)?;
        } else {
            write_text(&mut stdout, &info)?;
        }
        Ok(())
    }
}

fn write_text<W: Write>(out: &mut W, info: &LayerInfo) -> io::Result<()> {
    writeln!(out, "layer:   {}", info.layer)?;
    writeln!(out, "crs:     {}", info.crs)?;
    writeln!(out, "records: {}", info.records)?;
    match (info.first_year, info.last_year) {
        (Some(first), Some(last)) => writeln!(out, "years:   {first}..{last}")?,
        _ => writeln!(out, "years:   -")?,
    }
    match info.bounds {
        Some([min_x, min_y, max_x, max_y]) => writeln!(
            out,
            "bounds:  [{min_x:.1}, {min_y:.1}, {max_x:.1}, {max_y:.1}]"
        )?,
        None => writeln!(out, "bounds:  -")?,
    }
    writeln!(out, "fields:  {}", info.fields.join(", "))
}
