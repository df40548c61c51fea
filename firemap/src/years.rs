use crate::options::Years;
use anyhow::Result;
use perimeter::YearSummary;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::Path,
};
use textplots::{Chart, Plot, Shape};

impl Years {
    pub fn run(&self, source: &Path) -> Result<()> {
        let summary = crate::load_layer(source, &self.layer, self.years)?.summary_by_year();
        if self.json {
            print_json(&summary)?;
        } else {
            write_table(&mut io::stdout().lock(), &summary)?;
        }
        if self.chart {
            draw_chart(&summary);
        }
        Ok(())
    }
}

fn write_table<W: Write>(out: &mut W, summary: &BTreeMap<i32, YearSummary>) -> io::Result<()> {
    writeln!(out, "{:>6} {:>6} {:>14}", "year", "count", "acres")?;
    for (year, YearSummary { count, acres }) in summary {
        writeln!(out, "{year:>6} {count:>6} {acres:>14.1}")?;
    }
    Ok(())
}

fn print_json(summary: &BTreeMap<i32, YearSummary>) -> Result<()> {
    #[derive(Serialize)]
    struct JsonEntry {
        year: i32,
        count: usize,
        acres: f64,
    }

    let reshaped: Vec<JsonEntry> = summary
        .iter()
        .map(|(&year, &YearSummary { count, acres })| JsonEntry { year, count, acres })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_chart(summary: &BTreeMap<i32, YearSummary>) {
    let (Some(&first), Some(&last)) = (summary.keys().next(), summary.keys().next_back()) else {
        return;
    };
    let plot_data: Vec<(f32, f32)> = summary
        .iter()
        .map(|(&year, entry)| (year as f32, entry.count as f32))
        .collect();
    Chart::new(300, 150, first as f32 - 1.0, last as f32 + 1.0)
        .lineplot(&Shape::Bars(&plot_data))
        .display();
}
