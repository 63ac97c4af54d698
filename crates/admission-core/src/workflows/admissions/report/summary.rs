use chrono::{DateTime, FixedOffset, Utc};

use super::super::domain::AdmissionRecord;
use super::super::filter::FilterSelection;
use super::super::status::{StatusTally, StatusTone, UnknownStatusPolicy};
use super::html::render_report_html;
use super::views::{ReportDocument, ReportPayload, ReportRow, ReportSummary};

pub const REPORT_ID_PREFIX: &str = "AAM";
const NOT_AVAILABLE: &str = "N/A";

/// Inputs for one report run. Pure: no clock reads and no I/O happen here.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionReport<'a> {
    pub records: &'a [&'a AdmissionRecord],
    pub selection: FilterSelection,
    pub generated_at: DateTime<Utc>,
    pub zone: FixedOffset,
}

impl<'a> AdmissionReport<'a> {
    pub fn new(
        records: &'a [&'a AdmissionRecord],
        selection: FilterSelection,
        generated_at: DateTime<Utc>,
        zone: FixedOffset,
    ) -> Self {
        Self {
            records,
            selection,
            generated_at,
            zone,
        }
    }

    pub fn tally(&self) -> StatusTally {
        StatusTally::from_records(
            self.records.iter().copied(),
            UnknownStatusPolicy::StrictOtherBucket,
        )
    }

    pub fn summary(&self) -> ReportSummary {
        let tally = self.tally();
        ReportSummary {
            report_id: report_id(self.generated_at),
            period: self.selection.period_label(),
            generated_at: self.generated_at,
            total: tally.total,
            accepted: tally.accepted,
            pending: tally.pending,
            rejected: tally.rejected,
            under_review: tally.under_review,
            other: tally.other,
            acceptance_rate: tally.acceptance_rate_label(),
        }
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.records
            .iter()
            .map(|record| ReportRow {
                student_name: or_not_available(&record.student_name),
                program: or_not_available(&record.program_of_interest),
                email: or_not_available(&record.email_address),
                address: or_not_available(&record.home_address),
                school: or_not_available(&record.school_name),
                consultant: or_not_available(&record.consultant_name),
                admission_status: or_not_available(&record.admission_status),
                admission_tone: StatusTone::for_admission(&record.admission_status),
                visa_status: or_not_available(&record.visa_status),
                visa_tone: StatusTone::for_visa(&record.visa_status),
                date_applied: record.created_at.with_timezone(&self.zone).date_naive(),
            })
            .collect()
    }

    pub fn file_name(&self) -> String {
        report_file_name(&self.selection, self.generated_at, self.zone)
    }

    /// Build the printable document and its delivery payload.
    pub fn synthesize(&self) -> ReportDocument {
        let payload = ReportPayload {
            summary: self.summary(),
            applications: self.rows(),
        };
        let html = render_report_html(&payload, &self.selection, self.zone);
        ReportDocument {
            file_name: self.file_name(),
            html,
            payload,
        }
    }
}

pub fn report_id(generated_at: DateTime<Utc>) -> String {
    format!("{REPORT_ID_PREFIX}-{}", generated_at.timestamp_millis())
}

/// `admission-report-<timestamp>[-<Mon-YYYY>|-<start>-to-<end>].html`
pub fn report_file_name(
    selection: &FilterSelection,
    generated_at: DateTime<Utc>,
    zone: FixedOffset,
) -> String {
    let stamp = generated_at
        .with_timezone(&zone)
        .format("%Y-%m-%d-%H-%M-%S");
    match selection {
        FilterSelection::All => format!("admission-report-{stamp}.html"),
        FilterSelection::Month { month } => {
            format!("admission-report-{stamp}-{}.html", month.short_label())
        }
        FilterSelection::Range { range } => format!(
            "admission-report-{stamp}-{}-to-{}.html",
            range.start, range.end
        ),
    }
}

fn or_not_available(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}
