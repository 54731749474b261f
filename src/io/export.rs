//! Export the full (untruncated) diff.
//!
//! Reports only show the top rows; exports carry every joined holding so the
//! numbers can be checked in a spreadsheet.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DiffRow, RankedTable};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct DiffFile<'a> {
    tool: &'static str,
    today_date: NaiveDate,
    yesterday_date: NaiveDate,
    rows: &'a [DiffRow],
}

/// Write every diff row to a CSV file (`name,today,yesterday,delta`).
pub fn write_diff_csv(path: &Path, table: &RankedTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in &table.rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the diff with its dates to a pretty-printed JSON file.
pub fn write_diff_json(path: &Path, table: &RankedTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let doc = DiffFile {
        tool: "etf-report",
        today_date: table.today_date,
        yesterday_date: table.yesterday_date,
        rows: &table.rows,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::config(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
