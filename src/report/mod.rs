//! Report rendering: plain-text and HTML bodies for the ranked diff.
//!
//! Rendering is pure string production; delivery lives in `crate::mail`.

use chrono::NaiveDate;

use crate::diff::round2;
use crate::domain::{DiffRow, Report, ReportFormat};

pub mod format;
pub mod html;

pub use format::render_plain;
pub use html::render_html;

/// Localized column labels, shared by both formats.
pub const COL_NAME: &str = "종목명";
pub const COL_TODAY: &str = "오늘(%)";
pub const COL_YESTERDAY: &str = "어제(%)";
pub const COL_DELTA: &str = "증감(P)";

/// Direction of a weight change as it is shown to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaClass {
    Increase,
    Decrease,
    Unchanged,
}

impl DeltaClass {
    /// Classify on the two-decimal value, so a cell printed as `0.00` is never colored.
    pub fn of(delta: f64) -> Self {
        let shown = shown_value(delta);
        if shown > 0.0 {
            DeltaClass::Increase
        } else if shown < 0.0 {
            DeltaClass::Decrease
        } else {
            DeltaClass::Unchanged
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DeltaClass::Increase => "increase",
            DeltaClass::Decrease => "decrease",
            DeltaClass::Unchanged => "unchanged",
        }
    }

    /// Inline style for the delta cell: warm for up, cool for down.
    pub fn inline_style(self) -> &'static str {
        match self {
            DeltaClass::Increase => "color: #d9534f; font-weight: bold;",
            DeltaClass::Decrease => "color: #0275d8; font-weight: bold;",
            DeltaClass::Unchanged => "color: #333;",
        }
    }
}

/// Render `rows` (already truncated by the caller) in the requested format.
pub fn render(rows: &[DiffRow], report_date: NaiveDate, format: ReportFormat, title: &str) -> String {
    match format {
        ReportFormat::Plain => render_plain(rows, report_date, title),
        ReportFormat::Html => render_html(rows, report_date, title),
    }
}

/// Email subject line for a report date.
pub fn subject(report_date: NaiveDate) -> String {
    format!("[ETF 분석] {} 포트폴리오 리포트", report_date.format("%Y-%m-%d"))
}

/// Render and package a report for delivery.
pub fn build_report(rows: &[DiffRow], report_date: NaiveDate, format: ReportFormat, title: &str) -> Report {
    Report {
        subject: subject(report_date),
        body: render(rows, report_date, format, title),
        format,
    }
}

/// Weight cell text (two decimals).
pub(crate) fn fmt_weight(v: f64) -> String {
    format!("{:.2}", shown_value(v))
}

/// Delta cell text: signed, except for an unchanged `0.00`.
pub(crate) fn fmt_delta(v: f64) -> String {
    let shown = shown_value(v);
    if shown == 0.0 {
        "0.00".to_string()
    } else {
        format!("{shown:+.2}")
    }
}

/// Two-decimal value with negative zero folded into zero.
fn shown_value(v: f64) -> f64 {
    let r = round2(v);
    if r == 0.0 { 0.0 } else { r }
}
