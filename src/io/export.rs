//! CSV export of per-iteration simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::monte_carlo::TrialOutcome;

/// Schema v1 column header for the per-iteration results export.
const HEADER: &str = "iteration,npv_base,npv_apm,npv_improvement,\
                      irr_apm,payback_year_apm,\
                      final_capacity_base,final_capacity_apm,\
                      mean_availability_base,mean_availability_apm";

/// Exports per-iteration results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per trial, in iteration
/// order. Undefined IRRs and beyond-horizon paybacks render as empty
/// cells, never as zeros. Produces deterministic output for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(trials: &[TrialOutcome], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trials, buf)
}

/// Writes per-iteration results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(trials: &[TrialOutcome], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for t in trials {
        wtr.write_record(&[
            t.iteration.to_string(),
            format!("{:.2}", t.base.npv),
            format!("{:.2}", t.apm.npv),
            format!("{:.2}", t.npv_improvement),
            t.apm.irr.map_or(String::new(), |r| format!("{r:.6}")),
            t.apm
                .payback_year
                .map_or(String::new(), |y| y.to_string()),
            format!("{:.4}", t.base_summary.final_capacity_frac),
            format!("{:.4}", t.apm_summary.final_capacity_frac),
            format!("{:.4}", t.base_summary.mean_availability),
            format!("{:.4}", t.apm_summary.mean_availability),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
