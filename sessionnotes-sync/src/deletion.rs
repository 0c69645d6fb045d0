//! Two-step delete: pick a target, then confirm or cancel.
//!
//! Picking never touches the persistence service. Confirming deletes only the
//! picked note, and at most one confirmation runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use sessionnotes_core::{NoteId, SessionNote};

use crate::error::StoreError;
use crate::flight::FlightGuard;
use crate::store::NoteStore;

/// Result of [`DeleteConfirmation::confirm_delete`] when no request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No target was selected; nothing was sent.
    NothingSelected,
    /// A confirmation for this cycle is still running; nothing was sent.
    AlreadyInFlight,
    /// The service confirmed the delete of this note.
    Deleted(NoteId),
}

/// Confirmation state for deleting one note from a [`NoteStore`].
pub struct DeleteConfirmation {
    store: NoteStore,
    target: Mutex<Option<SessionNote>>,
    deleting: AtomicBool,
}

impl DeleteConfirmation {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            target: Mutex::new(None),
            deleting: AtomicBool::new(false),
        }
    }

    /// Select the note with `id` as the delete target.
    ///
    /// Returns the selected note, or `None` if `id` is not in the store's list
    /// or a delete is currently running.
    pub async fn request_delete(&self, id: &NoteId) -> Option<SessionNote> {
        if self.is_deleting() {
            tracing::debug!(%id, "delete in flight; ignoring new selection");
            return None;
        }
        let note = self.store.get(id).await?;
        *self.target.lock().await = Some(note.clone());
        Some(note)
    }

    /// Delete the selected note. The selection is cleared whether the delete
    /// succeeds or fails.
    pub async fn confirm_delete(&self) -> Result<DeleteOutcome, StoreError> {
        let Some(_deleting) = FlightGuard::acquire(&self.deleting) else {
            return Ok(DeleteOutcome::AlreadyInFlight);
        };

        let Some(note) = self.target.lock().await.clone() else {
            return Ok(DeleteOutcome::NothingSelected);
        };

        let result = self.store.remove(&note.id).await;
        {
            let mut target = self.target.lock().await;
            if target.as_ref().is_some_and(|t| t.id == note.id) {
                *target = None;
            }
        }

        result.map(|()| DeleteOutcome::Deleted(note.id))
    }

    /// Drop the selection without deleting anything.
    pub async fn cancel(&self) {
        *self.target.lock().await = None;
    }

    /// The currently selected note, if any.
    pub async fn selected(&self) -> Option<SessionNote> {
        self.target.lock().await.clone()
    }

    /// True while a confirmed delete is waiting on the service.
    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }
}
