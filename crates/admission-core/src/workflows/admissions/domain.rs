use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ADMISSION_STATUS: &str = "Pending";
pub const DEFAULT_VISA_STATUS: &str = "Documentation in progress";

/// Admission statuses offered by the intake and edit menus. Stored values are free text.
pub const ADMISSION_STATUS_OPTIONS: [&str; 5] = [
    "Pending",
    "Under Review",
    "Accepted",
    "Rejected",
    "Waitlisted",
];

/// Visa statuses offered by the intake and edit menus. Stored values are free text.
pub const VISA_STATUS_OPTIONS: [&str; 6] = [
    "Documentation in progress",
    "Application submitted",
    "Interview scheduled",
    "Approved",
    "Rejected",
    "Not applicable",
];

/// Store-assigned identifier for an admission record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One student application as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    pub id: RecordId,
    pub student_name: String,
    pub program_of_interest: String,
    pub email_address: String,
    pub home_address: String,
    pub school_name: String,
    pub consultant_name: String,
    pub admission_status: String,
    pub visa_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdmissionRecord {
    /// Materialize a validated intake into a stored record.
    pub fn from_new(id: RecordId, admission: NewAdmission, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_name: admission.student_name,
            program_of_interest: admission.program_of_interest,
            email_address: admission.email_address,
            home_address: admission.home_address,
            school_name: admission.school_name,
            consultant_name: admission.consultant_name,
            admission_status: admission.admission_status,
            visa_status: admission.visa_status,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn status(&self, field: StatusField) -> &str {
        match field {
            StatusField::AdmissionStatus => &self.admission_status,
            StatusField::VisaStatus => &self.visa_status,
        }
    }

    pub fn set_status(&mut self, field: StatusField, value: String) {
        match field {
            StatusField::AdmissionStatus => self.admission_status = value,
            StatusField::VisaStatus => self.visa_status = value,
        }
    }

    /// UTC calendar date of creation, used by the date-range filter.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Raw form input collected before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDraft {
    pub student_name: String,
    pub program_of_interest: String,
    pub email_address: String,
    pub home_address: String,
    pub school_name: String,
    pub consultant_name: String,
    pub admission_status: String,
    pub visa_status: String,
}

impl Default for AdmissionDraft {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            program_of_interest: String::new(),
            email_address: String::new(),
            home_address: String::new(),
            school_name: String::new(),
            consultant_name: String::new(),
            admission_status: DEFAULT_ADMISSION_STATUS.to_string(),
            visa_status: DEFAULT_VISA_STATUS.to_string(),
        }
    }
}

/// Normalized intake ready to hand to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmission {
    pub student_name: String,
    pub program_of_interest: String,
    pub email_address: String,
    pub home_address: String,
    pub school_name: String,
    pub consultant_name: String,
    pub admission_status: String,
    pub visa_status: String,
}

/// The two record fields the status editor may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    AdmissionStatus,
    VisaStatus,
}

impl StatusField {
    /// Column name in the record store.
    pub const fn column(self) -> &'static str {
        match self {
            StatusField::AdmissionStatus => "admission_status",
            StatusField::VisaStatus => "visa_status",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StatusField::AdmissionStatus => "Admission Status",
            StatusField::VisaStatus => "Visa Status",
        }
    }

    pub const fn options(self) -> &'static [&'static str] {
        match self {
            StatusField::AdmissionStatus => &ADMISSION_STATUS_OPTIONS,
            StatusField::VisaStatus => &VISA_STATUS_OPTIONS,
        }
    }
}
