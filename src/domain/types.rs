//! Shared domain types.
//!
//! Everything here lives for a single run: snapshots are built fresh from the
//! fetched spreadsheets, diffed, rendered, and dropped.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of rows shown in a report unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 30;

/// Report heading used when no `--title` is given.
pub const DEFAULT_TITLE: &str = "TIME 미국나스닥100 액티브 분석";

/// A weight cell as it came out of the source table.
///
/// Coercion to a number is deferred to the differ so one bad cell never
/// aborts ingest.
#[derive(Debug, Clone, PartialEq)]
pub enum RawWeight {
    Number(f64),
    Text(String),
    Blank,
}

impl From<f64> for RawWeight {
    fn from(v: f64) -> Self {
        RawWeight::Number(v)
    }
}

impl From<&str> for RawWeight {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            RawWeight::Blank
        } else {
            RawWeight::Text(s.to_string())
        }
    }
}

/// One holding and its portfolio weight (percent).
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingWeight {
    pub name: String,
    pub weight: RawWeight,
}

impl HoldingWeight {
    pub fn new(name: impl Into<String>, weight: impl Into<RawWeight>) -> Self {
        Self {
            name: name.into(),
            weight: weight.into(),
        }
    }
}

/// All holdings published for one calendar date, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub holdings: Vec<HoldingWeight>,
}

impl Snapshot {
    pub fn new(date: NaiveDate, holdings: Vec<HoldingWeight>) -> Self {
        Self { date, holdings }
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }
}

/// One holding after the outer join: today, yesterday, and the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRow {
    pub name: String,
    pub today: f64,
    pub yesterday: f64,
    pub delta: f64,
}

/// Diff rows sorted by today's weight (descending).
///
/// Holds the full, untruncated diff; reports take a prefix via [`RankedTable::top`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    pub today_date: NaiveDate,
    pub yesterday_date: NaiveDate,
    pub rows: Vec<DiffRow>,
}

impl RankedTable {
    /// The `n` heaviest holdings today (fewer if the table is shorter).
    pub fn top(&self, n: usize) -> &[DiffRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Body format of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Plain,
    Html,
}

/// A rendered report ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub subject: String,
    pub body: String,
    pub format: ReportFormat,
}

/// Resolved settings for a single run.
///
/// This is derived from CLI flags (plus defaults). Credentials are not part of
/// it; they belong to the delivery side (`mail::MailConfig`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub report_date: NaiveDate,
    pub yesterday_date: NaiveDate,
    pub format: ReportFormat,
    pub top_n: usize,
    pub title: String,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, today: f64) -> DiffRow {
        DiffRow {
            name: name.to_string(),
            today,
            yesterday: 0.0,
            delta: today,
        }
    }

    #[test]
    fn raw_weight_from_blank_text_is_blank() {
        assert_eq!(RawWeight::from("   "), RawWeight::Blank);
        assert_eq!(RawWeight::from("1.5"), RawWeight::Text("1.5".to_string()));
    }

    #[test]
    fn top_clamps_to_table_length() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let table = RankedTable {
            today_date: date,
            yesterday_date: date,
            rows: vec![row("A", 2.0), row("B", 1.0)],
        };
        assert_eq!(table.top(30).len(), 2);
        assert_eq!(table.top(1)[0].name, "A");
        assert!(table.top(0).is_empty());
    }
}
