use serde::Serialize;
use tracing::{info, warn};

use super::collection::RecordCollection;
use super::domain::{RecordId, StatusField};
use super::gateway::{GatewayError, RecordStoreGateway};

/// Where the single status edit currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Idle,
    Editing {
        id: RecordId,
        field: StatusField,
        draft: String,
    },
    Committing {
        id: RecordId,
        field: StatusField,
        value: String,
    },
}

/// Result of a save request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Nothing was sent: no edit in progress, or the draft was blank.
    Skipped,
    Committed {
        id: RecordId,
        field: StatusField,
        value: String,
    },
}

/// Stages and commits one status change at a time.
#[derive(Debug, Default)]
pub struct StatusEditor {
    state: EditorState,
}

impl StatusEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_editing(&self, id: &RecordId, field: StatusField) -> bool {
        matches!(&self.state, EditorState::Editing { id: current, field: f, .. } if current == id && *f == field)
    }

    /// Start editing, replacing any edit already in progress.
    pub fn begin_edit(&mut self, id: RecordId, field: StatusField, current: &str) {
        self.state = EditorState::Editing {
            id,
            field,
            draft: current.to_string(),
        };
    }

    /// Replace the draft value. Ignored unless an edit is in progress.
    pub fn set_draft(&mut self, value: &str) {
        if let EditorState::Editing { draft, .. } = &mut self.state {
            *draft = value.to_string();
        }
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Idle;
    }

    /// Send the trimmed draft to the store and merge it locally on success.
    ///
    /// A blank draft keeps the edit open. On failure the collection is untouched and the
    /// editor returns to idle.
    pub fn save<G>(
        &mut self,
        gateway: &G,
        collection: &mut RecordCollection,
    ) -> Result<SaveOutcome, GatewayError>
    where
        G: RecordStoreGateway + ?Sized,
    {
        let (id, field, value) = match &self.state {
            EditorState::Editing { id, field, draft } if !draft.trim().is_empty() => {
                (id.clone(), *field, draft.trim().to_string())
            }
            _ => return Ok(SaveOutcome::Skipped),
        };

        self.state = EditorState::Committing {
            id: id.clone(),
            field,
            value: value.clone(),
        };

        let result = gateway.update(&id, field, &value);
        self.state = EditorState::Idle;

        match result {
            Ok(_) => {
                collection.merge_status(&id, field, &value);
                info!(record = %id, field = field.column(), %value, "status committed");
                Ok(SaveOutcome::Committed { id, field, value })
            }
            Err(err) => {
                warn!(record = %id, field = field.column(), error = %err, "status update failed");
                Err(err)
            }
        }
    }
}
