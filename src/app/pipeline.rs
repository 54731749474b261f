//! The report workflow, independent of where snapshots come from or where the
//! report goes:
//!
//! fetch today -> fetch yesterday -> diff -> export -> render -> deliver
//!
//! Missing data skips the run (logged, exit 0). Only local I/O and delivery
//! failures are returned as errors.

use log::{error, info, warn};

use crate::data::SnapshotSource;
use crate::domain::{RankedTable, Report, RunConfig};
use crate::error::{AppError, Unavailable};
use crate::mail::ReportSink;

/// How a run ended when nothing went wrong on our side.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Delivered(Report),
    Skipped(Unavailable),
}

/// Build the ranked table for the configured dates, or say why not.
pub fn build_table(config: &RunConfig, source: &dyn SnapshotSource) -> Result<RankedTable, Unavailable> {
    let today = source.fetch(config.report_date).inspect_err(|e| {
        warn!("No holdings for {}: {e}", config.report_date);
    })?;
    let yesterday = source.fetch(config.yesterday_date).inspect_err(|e| {
        warn!("No holdings for {}: {e}", config.yesterday_date);
    })?;

    crate::diff::diff(&today, &yesterday)
}

/// Run the whole workflow once.
pub fn run_report(
    config: &RunConfig,
    source: &dyn SnapshotSource,
    sink: &dyn ReportSink,
) -> Result<RunOutcome, AppError> {
    info!(
        "Building report for {} (compared with {}).",
        config.report_date, config.yesterday_date
    );

    let table = match build_table(config, source) {
        Ok(table) => table,
        Err(reason) => {
            warn!(
                "Skipping report: data for {} or {} is unavailable ({reason}).",
                config.report_date, config.yesterday_date
            );
            return Ok(RunOutcome::Skipped(reason));
        }
    };

    if let Some(path) = &config.export_csv {
        crate::io::export::write_diff_csv(path, &table)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_diff_json(path, &table)?;
    }

    let report = crate::report::build_report(
        table.top(config.top_n),
        config.report_date,
        config.format,
        &config.title,
    );

    sink.deliver(&report).inspect_err(|e| error!("Delivery failed: {e}"))?;
    Ok(RunOutcome::Delivered(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use crate::domain::{DEFAULT_TITLE, HoldingWeight, ReportFormat, Snapshot};

    struct MapSource(HashMap<NaiveDate, Snapshot>);

    impl SnapshotSource for MapSource {
        fn fetch(&self, date: NaiveDate) -> Result<Snapshot, Unavailable> {
            self.0.get(&date).cloned().ok_or(Unavailable::NotPublished)
        }
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<Report>>);

    impl ReportSink for RecordingSink {
        fn deliver(&self, report: &Report) -> Result<(), AppError> {
            self.0.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn deliver(&self, _report: &Report) -> Result<(), AppError> {
            Err(AppError::delivery("smtp down"))
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn config() -> RunConfig {
        RunConfig {
            report_date: d(2),
            yesterday_date: d(1),
            format: ReportFormat::Html,
            top_n: 2,
            title: DEFAULT_TITLE.to_string(),
            export_csv: None,
            export_json: None,
            dry_run: false,
        }
    }

    fn snap(day: u32, items: &[(&str, f64)]) -> Snapshot {
        Snapshot::new(d(day), items.iter().map(|(n, w)| HoldingWeight::new(*n, *w)).collect())
    }

    fn source_with(days: &[Snapshot]) -> MapSource {
        MapSource(days.iter().map(|s| (s.date, s.clone())).collect())
    }

    #[test]
    fn delivers_truncated_report() {
        let source = source_with(&[
            snap(2, &[("A", 10.0), ("B", 5.0)]),
            snap(1, &[("A", 8.0), ("C", 2.0)]),
        ]);
        let sink = RecordingSink::default();

        let outcome = run_report(&config(), &source, &sink).unwrap();
        assert!(matches!(outcome, RunOutcome::Delivered(_)));

        let sent = sink.0.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "[ETF 분석] 2025-06-02 포트폴리오 리포트");
        assert!(sent[0].body.contains(">A</td>"));
        assert!(sent[0].body.contains(">B</td>"));
        // Third row is cut by top_n = 2.
        assert!(!sent[0].body.contains(">C</td>"));
    }

    #[test]
    fn missing_today_skips_without_delivery() {
        let source = source_with(&[snap(1, &[("A", 8.0)])]);
        let sink = RecordingSink::default();

        let outcome = run_report(&config(), &source, &sink).unwrap();
        assert_eq!(outcome, RunOutcome::Skipped(Unavailable::NotPublished));
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn empty_yesterday_skips_without_delivery() {
        let source = source_with(&[snap(2, &[("A", 8.0)]), snap(1, &[])]);
        let sink = RecordingSink::default();

        let outcome = run_report(&config(), &source, &sink).unwrap();
        assert_eq!(outcome, RunOutcome::Skipped(Unavailable::Empty));
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn delivery_failure_is_an_error() {
        let source = source_with(&[snap(2, &[("A", 1.0)]), snap(1, &[("A", 1.0)])]);
        let err = run_report(&config(), &source, &FailingSink).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn export_contains_untruncated_diff() {
        let path = std::env::temp_dir().join(format!("etf_pipeline_{}.csv", std::process::id()));
        let mut cfg = config();
        cfg.export_csv = Some(path.clone());

        let source = source_with(&[
            snap(2, &[("A", 10.0), ("B", 5.0)]),
            snap(1, &[("A", 8.0), ("C", 2.0)]),
        ]);
        run_report(&cfg, &source, &RecordingSink::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text.lines().count(), 1 + 3);
    }
}
