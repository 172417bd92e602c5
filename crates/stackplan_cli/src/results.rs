//! Append-only CSV experiment log.
//!
//! Every successful `optimize` run adds one row. The header row is written
//! only when the file is new or empty, so a log can accumulate results from
//! many sessions.

use std::fs::OpenOptions;
use std::path::Path;

use serde::Serialize;
use stackplan_core::RunReport;

use crate::design::ProblemSource;

/// One row of the experiment log. Field renames are the column headers.
#[derive(Debug, Serialize)]
pub struct LogRow<'a> {
    #[serde(rename = "Benchmark Type")]
    benchmark_type: &'a str,
    #[serde(rename = "Benchmark File")]
    benchmark_file: &'a str,
    #[serde(rename = "Initial Area")]
    initial_area: u64,
    #[serde(rename = "Optimized Area")]
    optimized_area: u64,
    #[serde(rename = "Area Reduction (%)")]
    area_reduction: f64,
    #[serde(rename = "Initial Interconnect Length")]
    initial_wire_length: u64,
    #[serde(rename = "Optimized Interconnect Length")]
    optimized_wire_length: u64,
    #[serde(rename = "Interconnect Reduction (%)")]
    wire_length_reduction: f64,
    #[serde(rename = "Initial Power Consumption")]
    initial_power: f64,
    #[serde(rename = "Optimized Power Consumption")]
    optimized_power: f64,
    #[serde(rename = "Power Reduction (%)")]
    power_reduction: f64,
    #[serde(rename = "Initial Max Temperature")]
    initial_temperature: u64,
    #[serde(rename = "Optimized Max Temperature")]
    optimized_temperature: u64,
    #[serde(rename = "Temp Reduction (°C)")]
    temperature_reduction: i64,
    #[serde(rename = "Execution Time (s)")]
    execution_time: f64,
    #[serde(rename = "Initial Block Placements")]
    initial_placements: &'a str,
}

impl<'a> LogRow<'a> {
    /// Flattens a report into a log row.
    pub fn new(source: &'a ProblemSource, report: &'a RunReport) -> Self {
        Self {
            benchmark_type: source.kind(),
            benchmark_file: source.file(),
            initial_area: report.initial_area,
            optimized_area: report.optimized_area,
            area_reduction: report.area_reduction,
            initial_wire_length: report.initial_wire_length,
            optimized_wire_length: report.optimized_wire_length,
            wire_length_reduction: report.wire_length_reduction,
            initial_power: report.initial_power,
            optimized_power: report.optimized_power,
            power_reduction: report.power_reduction,
            initial_temperature: report.initial_temperature,
            optimized_temperature: report.optimized_temperature,
            temperature_reduction: report.temperature_reduction,
            execution_time: report.execution_time,
            initial_placements: &report.initial_placements,
        }
    }
}

/// Appends `row` to the CSV file at `path`, creating it if needed.
pub fn append_row(path: &Path, row: &LogRow<'_>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            seed: 5,
            initial_energy: 1200.0,
            optimized_energy: 900.0,
            initial_area: 1000,
            optimized_area: 800,
            area_reduction: 20.0,
            initial_wire_length: 200,
            optimized_wire_length: 100,
            wire_length_reduction: 50.0,
            initial_power: 200.0,
            optimized_power: 100.0,
            power_reduction: 50.0,
            initial_temperature: 30,
            optimized_temperature: 30,
            temperature_reduction: 0,
            execution_time: 0.42,
            iterations: 10,
            initial_placements: "Block 0: (x=1, y=2, layer=0); Block 1: (x=3, y=4, layer=1)".into(),
            initial_images: Vec::new(),
            optimized_images: Vec::new(),
        }
    }

    fn read_records(path: &Path) -> Vec<csv::StringRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .unwrap();
        reader.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let report = report();
        let source = ProblemSource::Sample;

        append_row(&path, &LogRow::new(&source, &report)).unwrap();
        append_row(&path, &LogRow::new(&source, &report)).unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "Benchmark Type");
        assert_eq!(&records[0][13], "Temp Reduction (°C)");
        assert_eq!(records[0].len(), 16);
        assert_eq!(&records[1][0], "Sample");
        assert_eq!(&records[1][1], "N/A");
        assert_eq!(&records[1][2], "1000");
        assert_eq!(
            &records[2][15],
            "Block 0: (x=1, y=2, layer=0); Block 1: (x=3, y=4, layer=1)"
        );
    }

    #[test]
    fn appends_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "Benchmark Type,Benchmark File\nold,row\n").unwrap();

        let report = report();
        let source = ProblemSource::Design("chip.json".into());
        append_row(&path, &LogRow::new(&source, &report)).unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 3);
        assert_eq!(&records[1][0], "old");
        assert_eq!(&records[2][0], "Design");
        assert_eq!(&records[2][1], "chip.json");
    }

    #[test]
    fn empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();

        let report = report();
        append_row(&path, &LogRow::new(&ProblemSource::Sample, &report)).unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "Benchmark File");
    }
}
