//! The four user-facing operations. Each handler is handed the store and the
//! view it should keep in sync, runs exactly one statement, and reloads the
//! view after a successful mutation. None of them keep state between calls.

use tracing::{info, warn};

use crate::db::RecordStore;
use crate::error::{RecordError, Result};
use crate::models::{StudentDraft, StudentRecord};
use crate::view::RecordView;

/// Answer to the "Are you sure you want to delete?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// An edit in progress: the id being edited plus the draft pre-filled from
/// the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: i64,
    pub draft: StudentDraft,
}

/// Insert a student and reload the view. Empty fields are accepted; they are
/// only logged.
pub fn insert_record<V: RecordView>(
    store: &RecordStore,
    view: &mut V,
    draft: &StudentDraft,
) -> Result<i64> {
    if draft.name.trim().is_empty() || draft.mobile.trim().is_empty() {
        warn!(
            name_empty = draft.name.trim().is_empty(),
            mobile_empty = draft.mobile.trim().is_empty(),
            "inserting student with empty fields"
        );
    }

    let id = store.create(&draft.name, draft.course, &draft.mobile)?;
    info!(id, course = %draft.course, "student created");
    view.refresh(store)?;
    Ok(id)
}

/// Look up students by exact name and highlight them. An empty result is
/// reported as [`RecordError::NoResultsFound`] and clears any highlights left
/// by an earlier search.
pub fn search_records<V: RecordView>(
    store: &RecordStore,
    view: &mut V,
    name: &str,
) -> Result<Vec<StudentRecord>> {
    let matches = store.read_by_name(name)?;
    info!(name, hits = matches.len(), "student search");

    if matches.is_empty() {
        view.highlight(&[]);
        return Err(RecordError::NoResultsFound {
            name: name.to_string(),
        });
    }

    let ids: Vec<i64> = matches.iter().map(|record| record.id).collect();
    view.highlight(&ids);
    Ok(matches)
}

/// Start editing the displayed record `id`. The row is re-read from the store
/// so the draft never carries stale values; a row deleted underneath the view
/// is reported as missing.
pub fn begin_edit<V: RecordView>(store: &RecordStore, view: &V, id: i64) -> Result<EditSession> {
    if view.record(id).is_none() {
        return Err(RecordError::RecordNotFound { id });
    }
    let record = store.read_one(id)?.ok_or(RecordError::RecordNotFound { id })?;
    Ok(EditSession {
        id,
        draft: record.draft(),
    })
}

/// Write the session's draft back and reload the view.
pub fn submit_edit<V: RecordView>(
    store: &RecordStore,
    view: &mut V,
    session: &EditSession,
) -> Result<()> {
    let draft = &session.draft;
    store.update(session.id, &draft.name, draft.course, &draft.mobile)?;
    info!(id = session.id, "student updated");
    view.refresh(store)
}

/// Delete `id` once the user has said yes. A `No` never reaches the store.
pub fn delete_record<V: RecordView>(
    store: &RecordStore,
    view: &mut V,
    id: i64,
    confirmation: Confirmation,
) -> Result<DeleteOutcome> {
    if confirmation == Confirmation::No {
        info!(id, "student deletion cancelled");
        return Ok(DeleteOutcome::Cancelled);
    }

    store.delete(id)?;
    info!(id, "student deleted");
    view.refresh(store)?;
    Ok(DeleteOutcome::Deleted)
}
