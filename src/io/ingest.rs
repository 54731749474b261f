//! Spreadsheet ingest and column normalization.
//!
//! Turns a holdings table (xls/xlsx workbook or CSV) into a [`Snapshot`].
//!
//! The fund has published the weight column both as `비중(%)` and as `비중`, so
//! columns are resolved through alias lists. Each snapshot is resolved on its
//! own; today's layout says nothing about yesterday's.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;
use log::debug;

use crate::domain::{HoldingWeight, Snapshot};
use crate::error::Unavailable;

/// Accepted labels for the holding-name column, in priority order.
pub const NAME_ALIASES: &[&str] = &["종목명", "name", "holding"];

/// Accepted labels for the weight column, in priority order.
pub const WEIGHT_ALIASES: &[&str] = &["비중(%)", "비중", "weight(%)", "weight"];

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    header_row: usize,
    name: usize,
    weight: usize,
}

/// Build a snapshot from text rows (header row included somewhere near the top).
///
/// The header row is the first row containing both a known name label and a
/// known weight label. Rows with a blank name are skipped; weight cells are
/// kept raw for the differ to coerce.
pub fn snapshot_from_rows(date: NaiveDate, rows: &[Vec<String>]) -> Result<Snapshot, Unavailable> {
    let cols = resolve_columns(rows)?;

    let holdings: Vec<HoldingWeight> = rows[cols.header_row + 1..]
        .iter()
        .filter_map(|row| {
            let name = row.get(cols.name).map(|s| s.trim()).filter(|s| !s.is_empty())?;
            let weight = row.get(cols.weight).map(String::as_str).unwrap_or("");
            Some(HoldingWeight::new(name, weight.trim()))
        })
        .collect();

    if holdings.is_empty() {
        return Err(Unavailable::Empty);
    }

    debug!(
        "{date}: {} holdings (header at row {}, name col {}, weight col {}).",
        holdings.len(),
        cols.header_row + 1,
        cols.name,
        cols.weight
    );

    Ok(Snapshot::new(date, holdings))
}

/// Decode the first worksheet of an xls/xlsx workbook.
pub fn read_workbook(date: NaiveDate, bytes: &[u8]) -> Result<Snapshot, Unavailable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Unavailable::Fetch(format!("unreadable workbook for {date}: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Unavailable::SchemaMismatch("workbook has no worksheets".to_string()))?
        .map_err(|e| Unavailable::Fetch(format!("unreadable worksheet for {date}: {e}")))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    snapshot_from_rows(date, &rows)
}

/// Read a holdings CSV file from disk.
pub fn read_csv(date: NaiveDate, path: &Path) -> Result<Snapshot, Unavailable> {
    let file = File::open(path)
        .map_err(|e| Unavailable::Fetch(format!("failed to open '{}': {e}", path.display())))?;
    read_csv_from_reader(date, file)
}

/// Read holdings CSV data from any reader.
pub fn read_csv_from_reader<R: Read>(date: NaiveDate, reader: R) -> Result<Snapshot, Unavailable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Unavailable::Fetch(format!("CSV parse error on line {}: {e}", idx + 1)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    snapshot_from_rows(date, &rows)
}

fn resolve_columns(rows: &[Vec<String>]) -> Result<Columns, Unavailable> {
    for (header_row, row) in rows.iter().enumerate() {
        let headers: Vec<String> = row.iter().map(|h| normalize_header_name(h)).collect();
        let Some(name) = find_alias(&headers, NAME_ALIASES) else {
            continue;
        };
        // A title row may mention a name label; the header also has a weight label.
        let Some(weight) = find_alias(&headers, WEIGHT_ALIASES) else {
            continue;
        };
        return Ok(Columns {
            header_row,
            name,
            weight,
        });
    }

    Err(Unavailable::SchemaMismatch(format!(
        "no header row with both a name column ({}) and a weight column ({})",
        NAME_ALIASES.join(", "),
        WEIGHT_ALIASES.join(", ")
    )))
}

/// First alias (in priority order) present among the headers wins.
fn find_alias(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let alias = normalize_header_name(alias);
        headers.iter().position(|h| *h == alias)
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports sometimes carry a BOM on the first cell, and the fund's
    // labels have appeared both as `비중(%)` and `비중 (%)`.
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
