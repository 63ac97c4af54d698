use std::fmt::Write as _;

use chrono::FixedOffset;

use super::super::filter::FilterSelection;
use super::views::{ReportPayload, ReportRow};

const REPORT_TITLE: &str = "Admission Applications Report";

const REPORT_STYLES: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; color: #333; background: #ffffff; font-size: 14px; line-height: 1.5; }
    .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #059669; padding-bottom: 20px; }
    .title { color: #059669; font-size: 28px; font-weight: bold; margin-bottom: 10px; }
    .date { color: #666; font-size: 14px; margin: 5px 0; }
    .summary { margin: 30px 0; padding: 25px; background: #f0fdf4; border-radius: 12px; border: 1px solid #d1fae5; }
    .summary h3 { color: #059669; margin-bottom: 20px; font-size: 20px; }
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }
    .stat { background: white; padding: 20px; border-radius: 10px; border-left: 5px solid #059669; }
    .stat-number { font-size: 32px; font-weight: bold; color: #059669; display: block; }
    .stat-label { font-size: 12px; color: #666; text-transform: uppercase; font-weight: 600; margin-top: 5px; }
    table { width: 100%; border-collapse: collapse; margin-top: 30px; background: white; }
    th, td { border: 1px solid #e5e7eb; padding: 12px 8px; text-align: left; font-size: 13px; }
    th { background: #059669; color: white; font-weight: 600; font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; }
    tr:nth-child(even) { background: #f9fafb; }
    .status-accepted, .status-pending, .status-rejected, .status-other { padding: 4px 8px; border-radius: 6px; font-size: 11px; font-weight: 600; display: inline-block; }
    .status-accepted { background: #dcfce7; color: #166534; }
    .status-pending { background: #fef3c7; color: #92400e; }
    .status-rejected { background: #fee2e2; color: #991b1b; }
    .status-other { background: #dbeafe; color: #1e40af; }
    .student-name { font-weight: 600; color: #111827; }
    .footer { margin-top: 50px; text-align: center; color: #666; font-size: 12px; border-top: 1px solid #e5e7eb; padding-top: 20px; }
    @media print {
      body { margin: 0; font-size: 12px; }
      .header { page-break-after: avoid; }
      tr { page-break-inside: avoid; }
    }
"#;

const TABLE_HEADINGS: [&str; 9] = [
    "Student Name",
    "Program",
    "Email",
    "Address",
    "School",
    "Consultant",
    "Admission Status",
    "Visa Status",
    "Date Applied",
];

/// Self-contained, print-ready markup for a report payload.
pub(crate) fn render_report_html(
    payload: &ReportPayload,
    selection: &FilterSelection,
    zone: FixedOffset,
) -> String {
    let summary = &payload.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{REPORT_TITLE}</title>").expect("write title");
    writeln!(html, "<style>{REPORT_STYLES}</style>\n</head>\n<body>").expect("write styles");

    html.push_str("<div class=\"header\">\n");
    writeln!(html, "  <div class=\"title\">{REPORT_TITLE}</div>").expect("write heading");
    writeln!(
        html,
        "  <div class=\"date\">Generated on {}</div>",
        summary
            .generated_at
            .with_timezone(&zone)
            .format("%-m/%-d/%Y")
    )
    .expect("write generated date");
    match selection {
        FilterSelection::All => {}
        FilterSelection::Month { month } => {
            writeln!(html, "  <div class=\"date\">Month: {}</div>", month.long_label())
                .expect("write month line");
        }
        FilterSelection::Range { range } => {
            writeln!(html, "  <div class=\"date\">Period: {}</div>", range.label())
                .expect("write period line");
        }
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"summary\">\n  <h3>Summary Statistics</h3>\n  <div class=\"stats\">\n");
    for (value, label) in [
        (summary.total, "Total Applications"),
        (summary.accepted, "Accepted"),
        (summary.pending, "Pending"),
        (summary.rejected, "Rejected"),
    ] {
        writeln!(
            html,
            "    <div class=\"stat\"><span class=\"stat-number\">{value}</span><div class=\"stat-label\">{label}</div></div>"
        )
        .expect("write stat");
    }
    writeln!(
        html,
        "    <div class=\"stat\"><span class=\"stat-number\">{}%</span><div class=\"stat-label\">Acceptance Rate</div></div>",
        summary.acceptance_rate
    )
    .expect("write acceptance rate");
    html.push_str("  </div>\n</div>\n");

    html.push_str("<table>\n  <thead>\n    <tr>");
    for heading in TABLE_HEADINGS {
        write!(html, "<th>{heading}</th>").expect("write heading cell");
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in &payload.applications {
        render_row(&mut html, row);
    }
    html.push_str("  </tbody>\n</table>\n");

    html.push_str("<div class=\"footer\">\n");
    html.push_str("  <p><strong>Admission Application Management System</strong></p>\n");
    writeln!(
        html,
        "  <p>This report contains {} applications with a {}% acceptance rate</p>",
        summary.total, summary.acceptance_rate
    )
    .expect("write footer totals");
    writeln!(
        html,
        "  <p class=\"report-id\">Report ID: {}</p>",
        escape_html(&summary.report_id)
    )
    .expect("write report id");
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

fn render_row(html: &mut String, row: &ReportRow) {
    html.push_str("    <tr>");
    write!(
        html,
        "<td><span class=\"student-name\">{}</span></td>",
        escape_html(&row.student_name)
    )
    .expect("write student cell");
    for value in [
        &row.program,
        &row.email,
        &row.address,
        &row.school,
        &row.consultant,
    ] {
        write!(html, "<td>{}</td>", escape_html(value)).expect("write text cell");
    }
    write!(
        html,
        "<td><span class=\"{}\">{}</span></td>",
        row.admission_tone.css_class(),
        escape_html(&row.admission_status)
    )
    .expect("write admission cell");
    write!(
        html,
        "<td><span class=\"{}\">{}</span></td>",
        row.visa_tone.css_class(),
        escape_html(&row.visa_status)
    )
    .expect("write visa cell");
    writeln!(
        html,
        "<td>{}</td></tr>",
        row.date_applied.format("%-m/%-d/%Y")
    )
    .expect("write date cell");
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
