use super::common::*;
use crate::workflows::admissions::collection::RecordCollection;
use crate::workflows::admissions::domain::{RecordId, StatusField};
use crate::workflows::admissions::editor::{EditorState, SaveOutcome, StatusEditor};
use crate::workflows::admissions::gateway::{GatewayError, RecordStoreGateway};

fn loaded(store: &impl RecordStoreGateway) -> RecordCollection {
    RecordCollection::new(store.select_all().expect("select succeeds"))
}

#[test]
fn begin_edit_seeds_draft_with_current_value() {
    let mut editor = StatusEditor::new();
    let id = RecordId("adm-000002".to_string());
    editor.begin_edit(id.clone(), StatusField::AdmissionStatus, "Pending");

    assert!(editor.is_editing(&id, StatusField::AdmissionStatus));
    assert!(!editor.is_editing(&id, StatusField::VisaStatus));
    assert_eq!(
        editor.state(),
        &EditorState::Editing {
            id,
            field: StatusField::AdmissionStatus,
            draft: "Pending".to_string(),
        }
    );
}

#[test]
fn cancel_discards_without_contacting_store() {
    let store = FailingWrites::new(seeded_store(), "should never be called");
    let mut collection = loaded(&store);
    let mut editor = StatusEditor::new();

    editor.begin_edit(
        RecordId("adm-000002".to_string()),
        StatusField::VisaStatus,
        "Documentation in progress",
    );
    editor.set_draft("Approved");
    editor.cancel();

    assert_eq!(editor.state(), &EditorState::Idle);
    let outcome = editor.save(&store, &mut collection).expect("idle save is a no-op");
    assert_eq!(outcome, SaveOutcome::Skipped);
}

#[test]
fn blank_draft_is_not_sent_and_edit_stays_open() {
    let store = FailingWrites::new(seeded_store(), "should never be called");
    let mut collection = loaded(&store);
    let mut editor = StatusEditor::new();
    let id = RecordId("adm-000002".to_string());

    editor.begin_edit(id.clone(), StatusField::AdmissionStatus, "Pending");
    editor.set_draft("   ");
    let outcome = editor.save(&store, &mut collection).expect("blank save is a no-op");

    assert_eq!(outcome, SaveOutcome::Skipped);
    assert!(editor.is_editing(&id, StatusField::AdmissionStatus));
}

#[test]
fn save_updates_one_field_and_merges_locally() {
    let store = seeded_store();
    let mut collection = loaded(&store);
    let mut editor = StatusEditor::new();
    let id = RecordId("adm-000002".to_string());

    editor.begin_edit(id.clone(), StatusField::AdmissionStatus, "Pending");
    editor.set_draft("  Accepted ");
    let outcome = editor.save(&store, &mut collection).expect("save succeeds");

    assert_eq!(
        outcome,
        SaveOutcome::Committed {
            id: id.clone(),
            field: StatusField::AdmissionStatus,
            value: "Accepted".to_string(),
        }
    );
    assert_eq!(editor.state(), &EditorState::Idle);

    let local = collection.get(&id).expect("record present");
    assert_eq!(local.admission_status, "Accepted");
    assert_eq!(local.visa_status, "Documentation in progress");

    let stored = store.select_all().expect("select succeeds");
    let remote = stored.iter().find(|r| r.id == id).expect("stored record");
    assert_eq!(remote.admission_status, "Accepted");
    assert_eq!(remote.updated_at, at(2025, 10, 15, 12, 0));
}

#[test]
fn failed_save_leaves_collection_untouched_and_returns_to_idle() {
    let store = FailingWrites::new(seeded_store(), "permission denied for table admissions");
    let mut collection = loaded(&store);
    let before = collection.clone();
    let mut editor = StatusEditor::new();

    editor.begin_edit(
        RecordId("adm-000001".to_string()),
        StatusField::AdmissionStatus,
        "Accepted",
    );
    editor.set_draft("Rejected");
    let err = editor
        .save(&store, &mut collection)
        .expect_err("store rejects writes");

    assert!(matches!(err, GatewayError::Store(_)));
    assert_eq!(
        err.user_message(),
        "Permission denied. Please contact administrator."
    );
    assert_eq!(collection, before);
    assert_eq!(editor.state(), &EditorState::Idle);
}

#[test]
fn new_edit_replaces_previous_one() {
    let mut editor = StatusEditor::new();
    let first = RecordId("adm-000001".to_string());
    let second = RecordId("adm-000003".to_string());

    editor.begin_edit(first.clone(), StatusField::AdmissionStatus, "Accepted");
    editor.begin_edit(second.clone(), StatusField::VisaStatus, "Approved");

    assert!(!editor.is_editing(&first, StatusField::AdmissionStatus));
    assert!(editor.is_editing(&second, StatusField::VisaStatus));
}
