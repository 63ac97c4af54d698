use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::workflows::admissions::delivery::{DeliveryChannel, DeliveryError};
use crate::workflows::admissions::domain::{
    AdmissionDraft, AdmissionRecord, NewAdmission, RecordId, StatusField,
};
use crate::workflows::admissions::gateway::{GatewayError, RecordStoreGateway};
use crate::workflows::admissions::report::ReportPayload;
use crate::workflows::admissions::store::InMemoryRecordStore;

pub(super) fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("utc offset")
}

pub(super) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn record(
    id: &str,
    consultant: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> AdmissionRecord {
    AdmissionRecord {
        id: RecordId(id.to_string()),
        student_name: format!("Student {id}"),
        program_of_interest: "BBA International Business".to_string(),
        email_address: format!("{id}@students.example.org"),
        home_address: "44 Harbour Street".to_string(),
        school_name: "St. Anne's Secondary".to_string(),
        consultant_name: consultant.to_string(),
        admission_status: status.to_string(),
        visa_status: "Documentation in progress".to_string(),
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn draft(name: &str, email: &str, consultant: &str) -> AdmissionDraft {
    AdmissionDraft {
        student_name: name.to_string(),
        program_of_interest: "Diploma in Nursing".to_string(),
        email_address: email.to_string(),
        home_address: "7 Cedar Close".to_string(),
        school_name: "Hillcrest Academy".to_string(),
        consultant_name: consultant.to_string(),
        ..AdmissionDraft::default()
    }
}

/// Newest-first fixture spanning two months and three consultants.
pub(super) fn seeded_store() -> InMemoryRecordStore {
    InMemoryRecordStore::seeded(vec![
        record("adm-000001", "Grace Bello", "Accepted", at(2025, 9, 2, 10, 0)),
        record("adm-000002", "Grace Bello", "Pending", at(2025, 9, 10, 14, 30)),
        record("adm-000003", "Grace Bello", "Rejected", at(2025, 9, 30, 23, 45)),
        record("adm-000004", " Omar Haddad ", "accepted", at(2025, 10, 1, 8, 15)),
        record("adm-000005", "Omar Haddad", "Deferred", at(2025, 10, 3, 9, 0)),
        record("adm-000006", "", "Under Review", at(2025, 10, 4, 16, 20)),
    ])
    .with_clock(|| at(2025, 10, 15, 12, 0))
}

/// Gateway whose writes always fail with the configured message.
#[derive(Default)]
pub(super) struct FailingWrites {
    pub(super) inner: InMemoryRecordStore,
    pub(super) message: String,
}

impl FailingWrites {
    pub(super) fn new(inner: InMemoryRecordStore, message: &str) -> Self {
        Self {
            inner,
            message: message.to_string(),
        }
    }
}

impl RecordStoreGateway for FailingWrites {
    fn insert(&self, _admission: NewAdmission) -> Result<Vec<AdmissionRecord>, GatewayError> {
        Err(GatewayError::Transport(self.message.clone()))
    }

    fn select_all(&self) -> Result<Vec<AdmissionRecord>, GatewayError> {
        self.inner.select_all()
    }

    fn select_range(
        &self,
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        self.inner.select_range(gte, lte)
    }

    fn update(
        &self,
        _id: &RecordId,
        _field: StatusField,
        _value: &str,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        Err(GatewayError::Store(self.message.clone()))
    }
}

/// Delivery channel that records what it was asked to send.
#[derive(Default)]
pub(super) struct MemoryDelivery {
    sent: Mutex<Vec<(String, ReportPayload)>>,
}

impl MemoryDelivery {
    pub(super) fn sent(&self) -> Vec<(String, ReportPayload)> {
        self.sent.lock().expect("delivery mutex poisoned").clone()
    }
}

impl DeliveryChannel for MemoryDelivery {
    fn deliver(&self, recipient: &str, payload: &ReportPayload) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .expect("delivery mutex poisoned")
            .push((recipient.to_string(), payload.clone()));
        Ok(())
    }
}

pub(super) fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
