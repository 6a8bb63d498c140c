//! Demand profile parsing from uploaded CSV files.

use std::io::Read;

use crate::error::{AssemblyError, AssemblyResult};

/// Reads an hourly demand series from a headerless CSV.
///
/// The first field of every row is one hourly value (kW); further fields
/// are ignored. Blank lines are skipped by the reader.
///
/// # Errors
///
/// Returns [`AssemblyError::MalformedDemandFile`] with the 1-based row number
/// if a first field is empty, non-numeric, or non-finite, if a row cannot be
/// decoded, or if the file holds no rows at all.
pub fn demand_series<R: Read>(reader: R) -> AssemblyResult<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut series = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let row = idx + 1;
        let record = record.map_err(|e| AssemblyError::MalformedDemandFile {
            row,
            reason: e.to_string(),
        })?;
        let field = record.get(0).unwrap_or("");
        if field.is_empty() {
            return Err(AssemblyError::MalformedDemandFile {
                row,
                reason: "empty demand value".to_string(),
            });
        }
        let value: f64 = field.parse().map_err(|_| AssemblyError::MalformedDemandFile {
            row,
            reason: format!("\"{field}\" is not a number"),
        })?;
        if !value.is_finite() {
            return Err(AssemblyError::MalformedDemandFile {
                row,
                reason: format!("\"{field}\" is not a finite number"),
            });
        }
        series.push(value);
    }

    if series.is_empty() {
        return Err(AssemblyError::MalformedDemandFile {
            row: 0,
            reason: "file contains no demand values".to_string(),
        });
    }
    Ok(series)
}
