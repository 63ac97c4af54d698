//! Admission application intake, status management, and reporting.
//!
//! Everything here works over an in-memory copy of the admissions table; the table itself
//! sits behind [`RecordStoreGateway`] so the aggregation code never depends on a transport.

pub mod collection;
pub mod consultants;
pub mod delivery;
pub mod domain;
pub mod editor;
pub mod filter;
pub mod gateway;
pub mod intake;
pub mod report;
pub mod service;
pub mod status;
pub mod store;

#[cfg(test)]
mod tests;

pub use collection::RecordCollection;
pub use consultants::{
    ConsultantOverview, ConsultantPerformance, ConsultantSummary, Podium, RankedConsultant,
    UNKNOWN_CONSULTANT,
};
pub use delivery::{
    DeliveryChannel, DeliveryError, DocumentRenderer, HtmlFileRenderer, RenderError,
    SimulatedDeliveryChannel,
};
pub use domain::{
    AdmissionDraft, AdmissionRecord, NewAdmission, RecordId, StatusField,
    ADMISSION_STATUS_OPTIONS, DEFAULT_ADMISSION_STATUS, DEFAULT_VISA_STATUS, VISA_STATUS_OPTIONS,
};
pub use editor::{EditorState, SaveOutcome, StatusEditor};
pub use filter::{DateRange, FilterSelection, FilterState, YearMonth, YearMonthParseError};
pub use gateway::{FailureCategory, GatewayError, RecordStoreGateway};
pub use intake::{is_valid_email, validate, ValidationError};
pub use report::{AdmissionReport, ReportDocument, ReportPayload, ReportRow, ReportSummary};
pub use service::{validate_recipient, AdmissionDesk, DeskError};
pub use status::{AdmissionBucket, StatusTally, StatusTone, UnknownStatusPolicy};
pub use store::{InMemoryRecordStore, JsonFileRecordStore};
