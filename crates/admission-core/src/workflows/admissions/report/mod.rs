mod export;
mod html;
mod summary;
pub mod views;

pub use export::{rows_to_csv, ExportError};
pub use summary::{report_file_name, report_id, AdmissionReport, REPORT_ID_PREFIX};
pub use views::{ReportDocument, ReportPayload, ReportRow, ReportSummary};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admissions::domain::{AdmissionRecord, RecordId};
    use crate::workflows::admissions::filter::{DateRange, FilterSelection, YearMonth};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn record(id: &str, status: &str, visa: &str) -> AdmissionRecord {
        let created_at = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        AdmissionRecord {
            id: RecordId(id.to_string()),
            student_name: "Lena <Novak>".to_string(),
            program_of_interest: "MSc Data Science".to_string(),
            email_address: format!("{id}@example.com"),
            home_address: String::new(),
            school_name: "Riverside High".to_string(),
            consultant_name: "Omar Haddad".to_string(),
            admission_status: status.to_string(),
            visa_status: visa.to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("utc offset")
    }

    #[test]
    fn empty_collection_yields_zero_counts_and_empty_body() {
        let generated_at = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();
        let report = AdmissionReport::new(&[], FilterSelection::All, generated_at, utc());
        let document = report.synthesize();

        assert_eq!(document.summary().total, 0);
        assert_eq!(document.summary().accepted, 0);
        assert_eq!(document.summary().acceptance_rate, "0");
        assert_eq!(document.summary().period, "All time");
        assert_eq!(document.summary().report_id, "AAM-1760000000000");
        assert!(document.html.contains("<tbody>\n  </tbody>"));
        assert!(document.payload.applications.is_empty());
    }

    #[test]
    fn tallies_and_tags_status_cells() {
        let rows = [
            record("a1", "Accepted", "Approved"),
            record("a2", "accepted", "Application submitted"),
            record("a3", "Pending", "Rejected by embassy"),
            record("a4", "Rejected", "Interview scheduled"),
        ];
        let refs: Vec<&AdmissionRecord> = rows.iter().collect();
        let generated_at = Utc::now();
        let document =
            AdmissionReport::new(&refs, FilterSelection::All, generated_at, utc()).synthesize();

        let summary = document.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.acceptance_rate, "50.0");

        assert_eq!(document.html.matches("<tr>").count(), 5);
        assert!(document
            .html
            .contains("<span class=\"status-accepted\">Approved</span>"));
        assert!(document
            .html
            .contains("<span class=\"status-pending\">Application submitted</span>"));
        assert!(document
            .html
            .contains("<span class=\"status-rejected\">Rejected by embassy</span>"));
        assert!(document
            .html
            .contains("<span class=\"status-other\">Interview scheduled</span>"));
        assert!(document.html.contains("Lena &lt;Novak&gt;"));
        assert!(document.html.contains("<td>N/A</td>"));
        assert!(document.html.contains("50.0% acceptance rate"));
    }

    #[test]
    fn file_name_reflects_filter() {
        let generated_at = Utc
            .with_ymd_and_hms(2025, 10, 15, 8, 5, 9)
            .single()
            .expect("valid timestamp");
        let month = YearMonth::new(2025, 9).expect("valid month");
        assert_eq!(
            report_file_name(&FilterSelection::All, generated_at, utc()),
            "admission-report-2025-10-15-08-05-09.html"
        );
        assert_eq!(
            report_file_name(&FilterSelection::Month { month }, generated_at, utc()),
            "admission-report-2025-10-15-08-05-09-Sep-2025.html"
        );
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid"),
            end: NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid"),
        };
        assert_eq!(
            report_file_name(&FilterSelection::Range { range }, generated_at, utc()),
            "admission-report-2025-10-15-08-05-09-2025-01-01-to-2025-01-31.html"
        );
    }

    #[test]
    fn csv_export_has_header_and_one_line_per_row() {
        let rows = [record("c1", "Accepted", "Approved"), record("c2", "Pending", "")];
        let refs: Vec<&AdmissionRecord> = rows.iter().collect();
        let report = AdmissionReport::new(&refs, FilterSelection::All, Utc::now(), utc());
        let csv = rows_to_csv(&report.rows()).expect("csv renders");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Student Name,Program,Email"));
        assert!(lines[2].contains("c2@example.com"));
        assert!(lines[2].ends_with(",N/A,2025-03-14"));
    }
}
