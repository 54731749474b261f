//! Command-line parsing for the daily ETF weight report.
//!
//! Parsing stays here; `app` turns the parsed flags into a `RunConfig` and
//! picks the snapshot source and report sink.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::timeetf::{DEFAULT_BASE_URL, DEFAULT_FUND_IDX};
use crate::domain::{DEFAULT_TITLE, DEFAULT_TOP_N, ReportFormat};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "etf-report",
    version,
    about = "Compare today's ETF holding weights with yesterday's and mail the ranked changes"
)]
pub struct Cli {
    /// Report date (YYYY-MM-DD). Defaults to today in local time.
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Comparison date (YYYY-MM-DD). Defaults to the day before `--date`.
    #[arg(long, value_name = "DATE")]
    pub yesterday: Option<NaiveDate>,

    /// Report body format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
    pub format: ReportFormat,

    /// Number of holdings shown in the report.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Report heading.
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Fund index on the download page.
    #[arg(long, env = "ETF_FUND_IDX", default_value_t = DEFAULT_FUND_IDX)]
    pub fund_idx: u32,

    /// Download endpoint for the holdings workbook.
    #[arg(long, env = "ETF_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Read today's holdings from a local CSV/xlsx file instead of downloading.
    #[arg(long, value_name = "FILE", requires = "yesterday_file")]
    pub today_file: Option<PathBuf>,

    /// Read yesterday's holdings from a local CSV/xlsx file instead of downloading.
    #[arg(long, value_name = "FILE", requires = "today_file")]
    pub yesterday_file: Option<PathBuf>,

    /// Export the full (untruncated) diff to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full (untruncated) diff to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Print the report to stdout instead of emailing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_daily_job() {
        let cli = Cli::parse_from(["etf-report"]);
        assert_eq!(cli.format, ReportFormat::Html);
        assert_eq!(cli.top, 30);
        assert_eq!(cli.title, DEFAULT_TITLE);
        assert!(cli.date.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn parses_dates_and_format() {
        let cli = Cli::parse_from([
            "etf-report",
            "--date",
            "2025-06-02",
            "--yesterday",
            "2025-05-30",
            "--format",
            "plain",
            "--top",
            "10",
        ]);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 6, 2));
        assert_eq!(cli.yesterday, NaiveDate::from_ymd_opt(2025, 5, 30));
        assert_eq!(cli.format, ReportFormat::Plain);
        assert_eq!(cli.top, 10);
    }

    #[test]
    fn local_files_come_in_pairs() {
        let res = Cli::try_parse_from(["etf-report", "--today-file", "t.csv"]);
        assert!(res.is_err());

        let cli = Cli::try_parse_from(["etf-report", "--today-file", "t.csv", "--yesterday-file", "y.csv"]).unwrap();
        assert_eq!(cli.today_file, Some(PathBuf::from("t.csv")));
    }
}
