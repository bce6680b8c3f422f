use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use halfpop::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod geojson;
mod provenance;
mod table;

#[derive(Parser, Debug)]
#[command(name = "half-population")]
#[command(about = "Split regions into two halves of a quantity, sparsest regions first")]
struct Cmd {
    /// Input GeoJSON FeatureCollection (Polygon/MultiPolygon features)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON path (input records plus the 0/1 column)
    #[arg(short, long)]
    output: PathBuf,

    /// Numeric attribute holding the quantity to halve
    #[arg(short, long)]
    property_to_half: String,

    /// Name of the new 0/1 attribute; must not exist in the input
    #[arg(short = 'c', long, default_value = "half")]
    output_column: String,

    /// Secondary ordering for regions with equal density
    #[arg(long, value_enum, default_value_t = TieBreakArg::InputOrder)]
    tie_break: TieBreakArg,

    /// Handling of regions whose area is zero
    #[arg(long, value_enum, default_value_t = ZeroAreaArg::Reject)]
    zero_area: ZeroAreaArg,

    /// Also write a per-region table (.csv, or .parquet)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Write <output-stem>.provenance.json next to the output
    #[arg(long)]
    provenance: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TieBreakArg {
    InputOrder,
    Id,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ZeroAreaArg {
    Reject,
    SortLast,
}

impl Cmd {
    fn partition_cfg(&self) -> PartitionCfg {
        PartitionCfg {
            tie_break: match self.tie_break {
                TieBreakArg::InputOrder => TieBreak::InputOrder,
                TieBreakArg::Id => TieBreak::Id,
            },
            zero_area: match self.zero_area {
                ZeroAreaArg::Reject => ZeroAreaPolicy::Reject,
                ZeroAreaArg::SortLast => ZeroAreaPolicy::SortLast,
            },
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let split = run(&cmd)?;
    tracing::debug!(deviation = split.deviation(), "done");
    Ok(())
}

/// Load, augment, allocate, report, then write. Every fallible step before
/// the first write aborts without producing output.
fn run(cmd: &Cmd) -> Result<Split> {
    let dataset = geojson::open(&cmd.input)?;
    tracing::info!(
        input = %cmd.input.display(),
        regions = dataset.len(),
        attributes = dataset.schema().properties.len(),
        driver = %dataset.schema().driver,
        geometry = %dataset.schema().geometry,
        crs = ?dataset.schema().crs,
        "input_loaded"
    );

    let dataset = add_output_column(dataset, &cmd.output_column)
        .with_context(|| format!("adding output column '{}'", cmd.output_column))?;
    tracing::info!(column = %cmd.output_column, "column_added");

    let cfg = cmd.partition_cfg();
    let alloc = allocate(dataset, &cmd.property_to_half, &cmd.output_column, cfg)
        .with_context(|| format!("halving '{}'", cmd.property_to_half))?;
    tracing::info!(
        total = alloc.split.total,
        first_half = alloc.split.first_half,
        second_half = alloc.split.second_half(),
        stop = alloc.stop.label(),
        tie_break = ?cfg.tie_break,
        zero_area = ?cfg.zero_area,
        "allocated"
    );

    println!("{}", alloc.split);

    geojson::write(&cmd.output, &alloc.dataset)?;
    tracing::info!(output = %cmd.output.display(), "output_written");

    if let Some(path) = &cmd.table {
        table::write(path, &alloc, &cmd.output_column)?;
    }

    if cmd.provenance {
        let params = json!({
            "input": cmd.input.to_string_lossy(),
            "property_to_half": cmd.property_to_half,
            "output_column": cmd.output_column,
            "tie_break": format!("{:?}", cfg.tie_break),
            "zero_area": format!("{:?}", cfg.zero_area),
        });
        let mut payload = provenance::Payload::new(params, &alloc).output(&cmd.output);
        if let Some(path) = &cmd.table {
            payload = payload.output(path);
        }
        let written = provenance::write_sidecar(&cmd.output, payload)?;
        tracing::info!(path = %written.display(), "provenance_written");
    }

    Ok(alloc.split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // Three unit squares with 10 each: A, then B ties at the boundary.
    const THREE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","id":"A","geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]},"properties":{"pop":10}},
        {"type":"Feature","id":"B","geometry":{"type":"Polygon","coordinates":[[[1,0],[2,0],[2,1],[1,1],[1,0]]]},"properties":{"pop":10}},
        {"type":"Feature","id":"C","geometry":{"type":"Polygon","coordinates":[[[2,0],[3,0],[3,1],[2,1],[2,0]]]},"properties":{"pop":10}}]}"#;

    fn cmd(dir: &std::path::Path, extra: &[&str]) -> Cmd {
        let input = dir.join("in.geojson");
        let output = dir.join("out/halves.geojson");
        let mut args = vec![
            "half-population".to_string(),
            "-i".into(),
            input.to_string_lossy().into_owned(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            "-p".into(),
            "pop".into(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cmd::try_parse_from(args).unwrap()
    }

    #[test]
    fn flags_and_defaults() {
        let c = Cmd::try_parse_from(["x", "-i", "a", "-o", "b", "-p", "pop"]).unwrap();
        assert_eq!(c.output_column, "half");
        assert!(matches!(c.tie_break, TieBreakArg::InputOrder));
        assert!(matches!(c.zero_area, ZeroAreaArg::Reject));
        assert!(!c.provenance);
        let c = Cmd::try_parse_from([
            "x",
            "--input",
            "a",
            "--output",
            "b",
            "--property-to-half",
            "votes",
            "--output-column",
            "side",
            "--tie-break",
            "id",
            "--zero-area",
            "sort-last",
        ])
        .unwrap();
        assert_eq!(c.property_to_half, "votes");
        assert_eq!(c.output_column, "side");
        assert_eq!(
            c.partition_cfg(),
            PartitionCfg {
                tie_break: TieBreak::Id,
                zero_area: ZeroAreaPolicy::SortLast
            }
        );
        assert!(Cmd::try_parse_from(["x", "-i", "a", "-o", "b"]).is_err());
    }

    #[test]
    fn run_writes_labelled_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("in.geojson"), THREE).unwrap();
        let table = dir.path().join("t.csv");
        let table_arg = table.to_string_lossy().into_owned();
        let c = cmd(dir.path(), &["--table", &table_arg, "--provenance"]);
        let split = run(&c).unwrap();
        assert_eq!(split, Split::new(30.0, 10.0));

        let out = geojson::open(&c.output).unwrap();
        let labels: Vec<_> = out
            .regions()
            .iter()
            .map(|r| r.attributes.get("half").cloned())
            .collect();
        assert_eq!(
            labels,
            vec![
                Some(AttrValue::Int(1)),
                Some(AttrValue::Int(0)),
                Some(AttrValue::Int(0))
            ]
        );
        assert_eq!(out.schema().property("half"), Some(AttrType::Int));
        assert!(table.exists());
        assert!(dir.path().join("out/halves.provenance.json").exists());
    }

    #[test]
    fn duplicate_column_aborts_before_writing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("in.geojson"), THREE).unwrap();
        let c = cmd(dir.path(), &["-c", "pop"]);
        let err = run(&c).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
        assert!(!c.output.exists());
    }

    #[test]
    fn zero_total_aborts_before_writing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("in.geojson"), THREE.replace("10", "0")).unwrap();
        let c = cmd(dir.path(), &[]);
        let err = run(&c).unwrap_err();
        assert!(format!("{err:#}").contains("total quantity must be positive"));
        assert!(!c.output.exists());
    }
}
