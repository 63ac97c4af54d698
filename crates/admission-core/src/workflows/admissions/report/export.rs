use serde::Serialize;

use super::views::ReportRow;

/// Flat CSV view of a report table, one line per application.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Student Name")]
    student_name: &'a str,
    #[serde(rename = "Program")]
    program: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "School")]
    school: &'a str,
    #[serde(rename = "Consultant")]
    consultant: &'a str,
    #[serde(rename = "Admission Status")]
    admission_status: &'a str,
    #[serde(rename = "Visa Status")]
    visa_status: &'a str,
    #[serde(rename = "Date Applied")]
    date_applied: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to write CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to finish CSV output: {0}")]
    Flush(String),
}

pub fn rows_to_csv(rows: &[ReportRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(CsvRow {
            student_name: &row.student_name,
            program: &row.program,
            email: &row.email,
            address: &row.address,
            school: &row.school,
            consultant: &row.consultant,
            admission_status: &row.admission_status,
            visa_status: &row.visa_status,
            date_applied: row.date_applied.to_string(),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Flush(err.to_string()))
}
