//! HTML report for email bodies.
//!
//! Mail clients drop `<style>` blocks and external sheets unpredictably, so
//! every element carries its own inline `style` attribute.

use chrono::NaiveDate;

use crate::domain::DiffRow;
use crate::report::{COL_DELTA, COL_NAME, COL_TODAY, COL_YESTERDAY, DeltaClass, fmt_delta, fmt_weight};

const BODY_STYLE: &str = "margin: 0; padding: 20px; background-color: #f5f7fa; \
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Malgun Gothic', Arial, sans-serif;";
const CONTAINER_STYLE: &str = "max-width: 800px; margin: 0 auto; background-color: #ffffff; \
    border-radius: 12px; padding: 30px;";
const HEADER_STYLE: &str = "margin-bottom: 30px; padding: 20px; border-radius: 8px; color: #ffffff; \
    background-color: #667eea; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);";
const TITLE_STYLE: &str = "margin: 0 0 8px 0; font-size: 24px; font-weight: 700;";
const SUBTITLE_STYLE: &str = "margin: 0; font-size: 14px;";
const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; margin-top: 20px; font-size: 13px; \
    border: 1px solid #e1e8ed;";
const TH_STYLE: &str = "background-color: #f8f9fc; color: #2d3748; font-weight: 600; padding: 14px 12px; \
    text-align: center; border-bottom: 2px solid #e1e8ed; font-size: 12px;";
const TD_NAME_STYLE: &str = "padding: 12px; text-align: left; font-weight: 600; color: #1a202c; \
    border-bottom: 1px solid #f0f0f0;";
const TD_NUM_STYLE: &str = "padding: 12px; text-align: right; color: #2d3748; border-bottom: 1px solid #f0f0f0;";
const ROW_EVEN_STYLE: &str = "background-color: #fcfcfd;";
const FOOTER_STYLE: &str = "margin-top: 25px; padding-top: 20px; border-top: 1px solid #e1e8ed; \
    font-size: 12px; color: #718096; text-align: center;";

/// Render the full HTML document.
pub fn render_html(rows: &[DiffRow], report_date: NaiveDate, title: &str) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("</head>\n");
    out.push_str(&format!("<body style=\"{BODY_STYLE}\">\n"));
    out.push_str(&format!("<div style=\"{CONTAINER_STYLE}\">\n"));

    out.push_str(&format!("<div style=\"{HEADER_STYLE}\">\n"));
    out.push_str(&format!("<h2 style=\"{TITLE_STYLE}\">🚀 {}</h2>\n", escape(title)));
    out.push_str(&format!(
        "<p style=\"{SUBTITLE_STYLE}\">데이터 기준일: <b>{}</b></p>\n",
        report_date.format("%Y-%m-%d")
    ));
    out.push_str("</div>\n");

    out.push_str(&render_table(rows));

    out.push_str(&format!(
        "<div style=\"{FOOTER_STYLE}\">📊 본 메일은 자동으로 생성되었습니다.</div>\n"
    ));
    out.push_str("</div>\n</body>\n</html>\n");

    out
}

fn render_table(rows: &[DiffRow]) -> String {
    let mut out = String::new();

    out.push_str(&format!("<table style=\"{TABLE_STYLE}\">\n<thead>\n<tr>"));
    for label in [COL_NAME, COL_TODAY, COL_YESTERDAY, COL_DELTA] {
        out.push_str(&format!("<th style=\"{TH_STYLE}\">{label}</th>"));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (i, r) in rows.iter().enumerate() {
        if i % 2 == 1 {
            out.push_str(&format!("<tr style=\"{ROW_EVEN_STYLE}\">"));
        } else {
            out.push_str("<tr>");
        }
        out.push_str(&format!("<td style=\"{TD_NAME_STYLE}\">{}</td>", escape(&r.name)));
        out.push_str(&format!("<td style=\"{TD_NUM_STYLE}\">{}</td>", fmt_weight(r.today)));
        out.push_str(&format!("<td style=\"{TD_NUM_STYLE}\">{}</td>", fmt_weight(r.yesterday)));
        out.push_str(&delta_cell(r.delta));
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

fn delta_cell(delta: f64) -> String {
    let class = DeltaClass::of(delta);
    format!(
        "<td class=\"delta {}\" style=\"{TD_NUM_STYLE} {}\">{}</td>",
        class.css_class(),
        class.inline_style(),
        fmt_delta(delta)
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
