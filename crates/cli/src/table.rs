//! Per-region allocation table (CSV or Parquet).
//!
//! One row per region in input order: id, quantity, area, density, position in
//! the processing order, and the 0/1 label under the output column name.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use halfpop::partition::Allocation;
use polars::prelude::*;

/// Build the table as a DataFrame.
pub fn frame(alloc: &Allocation, output_column: &str) -> Result<DataFrame> {
    let ids: Vec<String> = alloc
        .dataset
        .regions()
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    let areas: Vec<f64> = alloc.densities.iter().map(|d| d.area).collect();
    let densities: Vec<f64> = alloc.densities.iter().map(|d| d.density).collect();
    let ranks: Vec<u32> = alloc.ranks().into_iter().map(|r| r as u32).collect();
    let labels: Vec<i32> = alloc.first_half.iter().map(|&b| i32::from(b)).collect();
    let df = DataFrame::new(vec![
        Series::new("id".into(), ids),
        Series::new("quantity".into(), alloc.quantities.clone()),
        Series::new("area".into(), areas),
        Series::new("density".into(), densities),
        Series::new("rank".into(), ranks),
        Series::new(output_column.into(), labels),
    ])?;
    Ok(df)
}

/// Write the table; `.parquet` selects Parquet, anything else CSV.
pub fn write(path: &Path, alloc: &Allocation, output_column: &str) -> Result<()> {
    let mut df = frame(alloc, output_column)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating table dir {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let parquet = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if parquet {
        ParquetWriter::new(file).finish(&mut df)?;
    } else {
        CsvWriter::new(file).include_header(true).finish(&mut df)?;
    }
    tracing::info!(path = %path.display(), rows = df.height(), parquet, "table_written");
    Ok(())
}
