use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{info, warn};

use super::collection::RecordCollection;
use super::consultants::ConsultantPerformance;
use super::delivery::{DeliveryChannel, DeliveryError, DocumentRenderer, RenderError};
use super::domain::{AdmissionDraft, AdmissionRecord, RecordId, StatusField};
use super::editor::{SaveOutcome, StatusEditor};
use super::filter::{FilterSelection, FilterState, YearMonth};
use super::gateway::{GatewayError, RecordStoreGateway};
use super::intake::{self, ValidationError};
use super::report::{AdmissionReport, ReportDocument, ReportSummary};
use super::status::{StatusTally, UnknownStatusPolicy};

/// Service composing the record store, delivery channel, and the in-memory collection.
///
/// Views are only available after [`AdmissionDesk::load`] has completed.
pub struct AdmissionDesk<G, D> {
    gateway: Arc<G>,
    delivery: Arc<D>,
    zone: FixedOffset,
    collection: Option<RecordCollection>,
    editor: StatusEditor,
}

impl<G, D> AdmissionDesk<G, D>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    pub fn new(gateway: Arc<G>, delivery: Arc<D>, zone: FixedOffset) -> Self {
        Self {
            gateway,
            delivery,
            zone,
            collection: None,
            editor: StatusEditor::new(),
        }
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn is_loaded(&self) -> bool {
        self.collection.is_some()
    }

    /// Fetch every record, newest first, replacing the in-memory collection.
    pub fn load(&mut self) -> Result<usize, DeskError> {
        let records = self.gateway.select_all().map_err(|err| {
            warn!(error = %err, "initial record fetch failed");
            err
        })?;
        let count = records.len();
        self.collection = Some(RecordCollection::new(records));
        info!(records = count, "admission records loaded");
        Ok(count)
    }

    pub fn collection(&self) -> Result<&RecordCollection, DeskError> {
        self.collection.as_ref().ok_or(DeskError::NotLoaded)
    }

    /// Validate a draft and hand it to the store. Nothing is sent when validation fails.
    pub fn submit(&mut self, draft: &AdmissionDraft) -> Result<AdmissionRecord, DeskError> {
        let admission = intake::validate(draft)?;
        let inserted = self.gateway.insert(admission).map_err(|err| {
            warn!(error = %err, category = ?err.category(), "application insert failed");
            err
        })?;
        let record = inserted.into_iter().next().ok_or_else(|| {
            GatewayError::Store("insert returned no rows".to_string())
        })?;

        if let Some(collection) = self.collection.as_mut() {
            collection.prepend(record.clone());
        }
        info!(record = %record.id, consultant = %record.consultant_name, "application submitted");
        Ok(record)
    }

    pub fn filtered(&self, filter: &FilterState) -> Result<Vec<&AdmissionRecord>, DeskError> {
        Ok(self.collection()?.filtered(&filter.selection(), self.zone))
    }

    /// Management-view counts. Unknown statuses are kept apart as `other`.
    pub fn management_tally(&self, filter: &FilterState) -> Result<StatusTally, DeskError> {
        let records = self.filtered(filter)?;
        Ok(StatusTally::from_records(
            records,
            UnknownStatusPolicy::StrictOtherBucket,
        ))
    }

    /// Consultant rankings over the loaded collection.
    pub fn consultant_performance(
        &self,
        filter: &FilterState,
    ) -> Result<ConsultantPerformance, DeskError> {
        let selection = filter.selection();
        let records = self.collection()?.filtered(&selection, self.zone);
        Ok(ConsultantPerformance::compute(
            selection.period_label(),
            records,
        ))
    }

    /// Consultant rankings for one month in the reporting zone, queried straight from the store.
    pub fn consultant_performance_for_month(
        &self,
        month: YearMonth,
    ) -> Result<ConsultantPerformance, DeskError> {
        let (gte, lte) = month.bounds_in(self.zone);
        let records = self.gateway.select_range(gte, lte)?;
        let selection = FilterSelection::Month { month };
        Ok(ConsultantPerformance::compute(
            selection.period_label(),
            selection.apply(&records, self.zone),
        ))
    }

    /// Build the report document for the current filter. An empty view is not an error here.
    pub fn build_report(
        &self,
        filter: &FilterState,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument, DeskError> {
        let selection = filter.selection();
        let records = self.collection()?.filtered(&selection, self.zone);
        Ok(AdmissionReport::new(&records, selection, generated_at, self.zone).synthesize())
    }

    /// Render the report for download and printing.
    pub fn export_report<R>(
        &self,
        filter: &FilterState,
        generated_at: DateTime<Utc>,
        renderer: &R,
    ) -> Result<PathBuf, DeskError>
    where
        R: DocumentRenderer + ?Sized,
    {
        let document = self.non_empty_report(filter, generated_at)?;
        let path = renderer.render(&document.file_name, &document.html)?;
        info!(
            path = %path.display(),
            report_id = %document.summary().report_id,
            "report document generated"
        );
        Ok(path)
    }

    /// Send the report payload to `recipient` through the delivery channel.
    pub fn email_report(
        &self,
        recipient: &str,
        filter: &FilterState,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportSummary, DeskError> {
        let recipient = validate_recipient(recipient)?;
        let document = self.non_empty_report(filter, generated_at)?;
        self.delivery
            .deliver(recipient, &document.payload)
            .map_err(|err| {
                warn!(recipient, error = %err, "report delivery failed");
                err
            })?;
        Ok(document.payload.summary)
    }

    pub fn editor(&self) -> &StatusEditor {
        &self.editor
    }

    /// Open an edit on one field, seeding the draft with the current value.
    pub fn begin_status_edit(&mut self, id: &RecordId, field: StatusField) -> Result<(), DeskError> {
        let current = self
            .collection()?
            .get(id)
            .map(|record| record.status(field).to_string())
            .ok_or_else(|| DeskError::UnknownRecord(id.clone()))?;
        self.editor.begin_edit(id.clone(), field, &current);
        Ok(())
    }

    pub fn set_status_draft(&mut self, value: &str) {
        self.editor.set_draft(value);
    }

    pub fn cancel_status_edit(&mut self) {
        self.editor.cancel();
    }

    pub fn save_status(&mut self) -> Result<SaveOutcome, DeskError> {
        let collection = self.collection.as_mut().ok_or(DeskError::NotLoaded)?;
        Ok(self.editor.save(self.gateway.as_ref(), collection)?)
    }

    fn non_empty_report(
        &self,
        filter: &FilterState,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument, DeskError> {
        let document = self.build_report(filter, generated_at)?;
        if document.payload.applications.is_empty() {
            return Err(DeskError::NoApplications);
        }
        Ok(document)
    }
}

/// Trimmed recipient address, or `InvalidRecipient` when it is not a plausible email.
pub fn validate_recipient(recipient: &str) -> Result<&str, DeskError> {
    let recipient = recipient.trim();
    if recipient.is_empty() || !intake::is_valid_email(recipient) {
        return Err(DeskError::InvalidRecipient(recipient.to_string()));
    }
    Ok(recipient)
}

/// Error raised by the admission desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("records have not been loaded yet")]
    NotLoaded,
    #[error("no applications match the current filter")]
    NoApplications,
    #[error("'{0}' is not a valid email address")]
    InvalidRecipient(String),
    #[error("record {0} is not in the loaded collection")]
    UnknownRecord(RecordId),
}

impl DeskError {
    /// Short message suitable for an alert after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            DeskError::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
