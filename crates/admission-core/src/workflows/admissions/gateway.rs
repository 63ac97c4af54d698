use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AdmissionRecord, NewAdmission, RecordId, StatusField};

/// Storage abstraction over the hosted admissions table.
///
/// Selects return rows newest first. Writes echo the affected rows back.
pub trait RecordStoreGateway: Send + Sync {
    fn insert(&self, admission: NewAdmission) -> Result<Vec<AdmissionRecord>, GatewayError>;
    fn select_all(&self) -> Result<Vec<AdmissionRecord>, GatewayError>;
    fn select_range(
        &self,
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    ) -> Result<Vec<AdmissionRecord>, GatewayError>;
    fn update(
        &self,
        id: &RecordId,
        field: StatusField,
        value: &str,
    ) -> Result<Vec<AdmissionRecord>, GatewayError>;
}

/// Failure reported by a record store adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Store(String),
    #[error("network request failed: {0}")]
    Transport(String),
    #[error("record {0} not found")]
    NotFound(RecordId),
}

/// User-facing grouping of gateway failures, chosen from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    DuplicateKey,
    Network,
    Permission,
    Other,
}

impl GatewayError {
    pub fn category(&self) -> FailureCategory {
        let message = self.to_string();
        if message.contains("duplicate key") {
            FailureCategory::DuplicateKey
        } else if message.contains("network") {
            FailureCategory::Network
        } else if message.contains("permission") {
            FailureCategory::Permission
        } else {
            FailureCategory::Other
        }
    }

    /// Message shown to the operator after a failed action.
    pub fn user_message(&self) -> String {
        match self.category() {
            FailureCategory::DuplicateKey => {
                "An application with this email already exists.".to_string()
            }
            FailureCategory::Network => {
                "Network error. Please check your internet connection.".to_string()
            }
            FailureCategory::Permission => {
                "Permission denied. Please contact administrator.".to_string()
            }
            FailureCategory::Other => self.to_string(),
        }
    }
}
