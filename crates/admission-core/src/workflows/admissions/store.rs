use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{AdmissionRecord, NewAdmission, RecordId, StatusField};
use super::gateway::{GatewayError, RecordStoreGateway};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

const ID_PREFIX: &str = "adm-";

/// Rows plus the id sequence. Shared by the bundled store adapters.
#[derive(Debug, Default)]
struct RecordTable {
    rows: Vec<AdmissionRecord>,
    next_sequence: u64,
}

impl RecordTable {
    fn from_rows(rows: Vec<AdmissionRecord>) -> Self {
        let next_sequence = rows
            .iter()
            .filter_map(|row| row.id.0.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            rows,
            next_sequence,
        }
    }

    fn insert(
        &mut self,
        admission: NewAdmission,
        now: DateTime<Utc>,
    ) -> Result<AdmissionRecord, GatewayError> {
        if self
            .rows
            .iter()
            .any(|row| row.email_address.eq_ignore_ascii_case(&admission.email_address))
        {
            return Err(GatewayError::Store(
                "duplicate key value violates unique constraint \"admissions_email_address_key\""
                    .to_string(),
            ));
        }

        let sequence = self.next_sequence.max(1);
        self.next_sequence = sequence + 1;
        let record =
            AdmissionRecord::from_new(RecordId(format!("{ID_PREFIX}{sequence:06}")), admission, now);
        self.rows.push(record.clone());
        Ok(record)
    }

    fn newest_first<F>(&self, keep: F) -> Vec<AdmissionRecord>
    where
        F: Fn(&AdmissionRecord) -> bool,
    {
        let mut rows: Vec<AdmissionRecord> =
            self.rows.iter().filter(|row| keep(row)).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn update(
        &mut self,
        id: &RecordId,
        field: StatusField,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<AdmissionRecord, GatewayError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        row.set_status(field, value.to_string());
        row.updated_at = now;
        Ok(row.clone())
    }
}

/// Process-local store used by tests and demos.
pub struct InMemoryRecordStore {
    table: Mutex<RecordTable>,
    clock: Clock,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::seeded(Vec::new())
    }
}

impl InMemoryRecordStore {
    pub fn seeded(rows: Vec<AdmissionRecord>) -> Self {
        Self {
            table: Mutex::new(RecordTable::from_rows(rows)),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the timestamp source used for `created_at` and `updated_at`.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn len(&self) -> usize {
        self.lock().map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordTable>, GatewayError> {
        self.table
            .lock()
            .map_err(|_| GatewayError::Store("record table lock poisoned".to_string()))
    }
}

impl RecordStoreGateway for InMemoryRecordStore {
    fn insert(&self, admission: NewAdmission) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let now = (self.clock)();
        let record = self.lock()?.insert(admission, now)?;
        Ok(vec![record])
    }

    fn select_all(&self) -> Result<Vec<AdmissionRecord>, GatewayError> {
        Ok(self.lock()?.newest_first(|_| true))
    }

    fn select_range(
        &self,
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        Ok(self
            .lock()?
            .newest_first(|row| row.created_at >= gte && row.created_at <= lte))
    }

    fn update(
        &self,
        id: &RecordId,
        field: StatusField,
        value: &str,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let now = (self.clock)();
        let record = self.lock()?.update(id, field, value, now)?;
        Ok(vec![record])
    }
}

/// Store persisted as a JSON array on disk so state survives between CLI runs.
pub struct JsonFileRecordStore {
    path: PathBuf,
    guard: Mutex<()>,
    clock: Clock,
}

impl JsonFileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RecordTable, GatewayError> {
        let rows = match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| {
                GatewayError::Store(format!(
                    "record file {} is not valid JSON: {err}",
                    self.path.display()
                ))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(self.io_error(err)),
        };
        Ok(RecordTable::from_rows(rows))
    }

    fn write(&self, table: &RecordTable) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let body = serde_json::to_string_pretty(&table.rows)
            .map_err(|err| GatewayError::Store(format!("unable to encode records: {err}")))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), rows = table.rows.len(), "record file written");
        Ok(())
    }

    fn io_error(&self, err: std::io::Error) -> GatewayError {
        GatewayError::Store(format!("record file {}: {err}", self.path.display()))
    }

    fn exclusive(&self) -> Result<MutexGuard<'_, ()>, GatewayError> {
        self.guard
            .lock()
            .map_err(|_| GatewayError::Store("record file lock poisoned".to_string()))
    }
}

impl RecordStoreGateway for JsonFileRecordStore {
    fn insert(&self, admission: NewAdmission) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let _lock = self.exclusive()?;
        let mut table = self.read()?;
        let record = table.insert(admission, (self.clock)())?;
        self.write(&table)?;
        Ok(vec![record])
    }

    fn select_all(&self) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let _lock = self.exclusive()?;
        Ok(self.read()?.newest_first(|_| true))
    }

    fn select_range(
        &self,
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let _lock = self.exclusive()?;
        Ok(self
            .read()?
            .newest_first(|row| row.created_at >= gte && row.created_at <= lte))
    }

    fn update(
        &self,
        id: &RecordId,
        field: StatusField,
        value: &str,
    ) -> Result<Vec<AdmissionRecord>, GatewayError> {
        let _lock = self.exclusive()?;
        let mut table = self.read()?;
        let record = table.update(id, field, value, (self.clock)())?;
        self.write(&table)?;
        Ok(vec![record])
    }
}
