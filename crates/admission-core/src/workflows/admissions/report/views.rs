use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::super::status::StatusTone;

/// Counts and labels handed to delivery channels alongside a generated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub report_id: String,
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub accepted: usize,
    pub pending: usize,
    pub rejected: usize,
    pub under_review: usize,
    pub other: usize,
    pub acceptance_rate: String,
}

/// One table row as it appears in the report and the delivery payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub student_name: String,
    pub program: String,
    pub email: String,
    pub address: String,
    pub school: String,
    pub consultant: String,
    pub admission_status: String,
    #[serde(skip)]
    pub admission_tone: StatusTone,
    pub visa_status: String,
    #[serde(skip)]
    pub visa_tone: StatusTone,
    pub date_applied: NaiveDate,
}

/// Everything a delivery channel needs to send a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    pub summary: ReportSummary,
    pub applications: Vec<ReportRow>,
}

/// Generated report: the printable markup plus its structured summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub file_name: String,
    pub html: String,
    pub payload: ReportPayload,
}

impl ReportDocument {
    pub fn summary(&self) -> &ReportSummary {
        &self.payload.summary
    }
}
