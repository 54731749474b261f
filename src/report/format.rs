//! Plain-text report: a fixed-width table suitable for terminals and text mail.
//!
//! Widths are display columns, not chars: Hangul names and labels take two
//! columns per character.

use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::DiffRow;
use crate::report::{COL_DELTA, COL_NAME, COL_TODAY, COL_YESTERDAY, fmt_delta, fmt_weight};

const NAME_WIDTH: usize = 28;
const NUM_WIDTH: usize = 10;

/// Render the plain-text report.
pub fn render_plain(rows: &[DiffRow], report_date: NaiveDate, title: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{title} — {}\n\n", report_date.format("%Y-%m-%d")));

    out.push_str(&format!(
        "{} {} {} {}\n",
        pad_right(COL_NAME, NAME_WIDTH),
        pad_left(COL_TODAY, NUM_WIDTH),
        pad_left(COL_YESTERDAY, NUM_WIDTH),
        pad_left(COL_DELTA, NUM_WIDTH),
    ));

    out.push_str(&format!(
        "{:-<nw$} {:-<w$} {:-<w$} {:-<w$}\n",
        "",
        "",
        "",
        "",
        nw = NAME_WIDTH,
        w = NUM_WIDTH
    ));

    for r in rows {
        out.push_str(&format!(
            "{} {} {} {}\n",
            pad_right(&truncate(&r.name, NAME_WIDTH), NAME_WIDTH),
            pad_left(&fmt_weight(r.today), NUM_WIDTH),
            pad_left(&fmt_weight(r.yesterday), NUM_WIDTH),
            pad_left(&fmt_delta(r.delta), NUM_WIDTH),
        ));
    }

    out
}

/// Cut `s` to at most `max` display columns, marking the cut with `.`.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('.');
    out
}

fn pad_right(s: &str, width: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(s.width())));
    out
}

fn pad_left(s: &str, width: usize) -> String {
    let mut out: String = std::iter::repeat_n(' ', width.saturating_sub(s.width())).collect();
    out.push_str(s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, today: f64, yesterday: f64) -> DiffRow {
        DiffRow {
            name: name.to_string(),
            today,
            yesterday,
            delta: today - yesterday,
        }
    }

    #[test]
    fn plain_report_layout() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let rows = vec![row("A", 10.0, 8.0), row("B", 5.0, 0.0), row("C", 0.0, 2.0)];

        let out = render_plain(&rows, date, "Weights");
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Weights — 2025-06-02");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with(COL_NAME));
        assert!(lines[3].starts_with("----"));
        assert_eq!(lines.len(), 4 + rows.len());

        let a: Vec<&str> = lines[4].split_whitespace().collect();
        assert_eq!(a, ["A", "10.00", "8.00", "+2.00"]);
        let c: Vec<&str> = lines[6].split_whitespace().collect();
        assert_eq!(c, ["C", "0.00", "2.00", "-2.00"]);
    }

    #[test]
    fn hangul_and_ascii_rows_line_up() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let rows = vec![
            row("엔비디아", 9.12, 8.8),
            row("Apple", 7.5, 7.6),
            row("알파벳 클래스 A 보통주 의결권 있음 주식", 3.0, 3.0),
        ];

        let out = render_plain(&rows, date, "T");
        let table: Vec<&str> = out.lines().skip(2).collect();
        let rule = table[1].width();

        assert_eq!(rule, NAME_WIDTH + 3 * (1 + NUM_WIDTH));
        for line in &table {
            assert_eq!(line.width(), rule, "misaligned line: {line:?}");
        }
    }

    #[test]
    fn plain_report_has_no_markup() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let out = render_plain(&[row("<b>X</b>", 1.0, 1.0)], date, "T");
        assert!(!out.contains("<table"));
        assert!(!out.contains("color"));
        assert!(out.contains("0.00"));
    }

    #[test]
    fn long_names_are_truncated_to_column() {
        let long = "Alphabet Inc Class A Common Stock Voting";
        let t = truncate(long, NAME_WIDTH);
        assert_eq!(t.width(), NAME_WIDTH);
        assert!(t.ends_with('.'));
        assert_eq!(truncate("short", NAME_WIDTH), "short");
    }

    #[test]
    fn wide_names_truncate_by_display_width() {
        let t = truncate("엔비디아코퍼레이션", 7);
        assert_eq!(t, "엔비디.");
        assert!(t.width() <= 7);
    }

    #[test]
    fn padding_counts_display_columns() {
        assert_eq!(pad_right("애플", 6), "애플  ");
        assert_eq!(pad_right("toolong", 3), "toolong");
        assert_eq!(pad_left("오늘(%)", 10), "   오늘(%)");
    }
}
