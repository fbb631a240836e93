//! CSV and JSON export for plans and sensitivity grids.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::plan::PlanResult;
use crate::sensitivity::SensitivityGrid;

/// Column header for the sensitivity grid CSV.
const HEADER: &str = "index,kwh_multiplier,fee_multiplier,rent_multiplier,\
                      kwh_per_gun_per_day,service_fee_yuan_per_kwh,rent_yuan_per_sqm_month,\
                      invest_total_yuan,revenue_net_year_yuan,payback_net_years,status";

/// Exports the sensitivity grid to a CSV file at the given path.
///
/// # Arguments
///
/// * `grid` - Evaluated 27-cell sensitivity grid
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_sensitivity_csv(grid: &SensitivityGrid, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_sensitivity_csv(grid, buf)
}

/// Writes the sensitivity grid as CSV to any writer.
///
/// One row per cell in grid order. Undefined paybacks are empty fields.
///
/// # Arguments
///
/// * `grid` - Evaluated 27-cell sensitivity grid
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_sensitivity_csv(grid: &SensitivityGrid, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for c in grid.cells() {
        wtr.write_record(&[
            c.index.to_string(),
            format!("{:.2}", c.kwh_multiplier),
            format!("{:.2}", c.fee_multiplier),
            format!("{:.2}", c.rent_multiplier),
            format!("{:.2}", c.kwh_per_gun_per_day),
            format!("{:.4}", c.service_fee_yuan_per_kwh),
            format!("{:.4}", c.rent_yuan_per_sqm_month),
            format!("{:.2}", c.invest_total_yuan),
            format!("{:.2}", c.revenue_net_year_yuan),
            c.payback_net_years
                .map(|y| format!("{y:.4}"))
                .unwrap_or_default(),
            c.status.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a plan result as pretty-printed JSON.
///
/// Undefined paybacks serialize as `null`.
///
/// # Arguments
///
/// * `result` - Evaluated plan
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_plan_json(result: &PlanResult, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    Ok(())
}
