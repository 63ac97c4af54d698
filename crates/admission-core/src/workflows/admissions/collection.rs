use chrono::FixedOffset;

use super::domain::{AdmissionRecord, RecordId, StatusField};
use super::filter::FilterSelection;

/// In-memory copy of the admissions table, kept in the order the store returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<AdmissionRecord>,
}

impl RecordCollection {
    pub fn new(records: Vec<AdmissionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AdmissionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&AdmissionRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// New submissions sort to the front, matching the newest-first store order.
    pub fn prepend(&mut self, record: AdmissionRecord) {
        self.records.insert(0, record);
    }

    /// Write a committed status into the local copy. Returns false when the id is unknown.
    pub fn merge_status(&mut self, id: &RecordId, field: StatusField, value: &str) -> bool {
        match self.records.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.set_status(field, value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn filtered(&self, selection: &FilterSelection, zone: FixedOffset) -> Vec<&AdmissionRecord> {
        selection.apply(&self.records, zone)
    }
}
