//! The in-memory note collection and its synchronization with the
//! persistence service.
//!
//! ## Rules
//!
//! 1. The list only changes after the service confirms a call; a failed call
//!    leaves it untouched.
//! 2. Every change to the list happens under one write lock, so readers see
//!    either the old list or the new one.
//! 3. No lock is held while a request is outstanding.
//! 4. The list is always sorted by `session_date` descending.
//! 5. A create or remove confirmed while a load is outstanding survives that
//!    load: it is replayed onto the fetched list before the list is replaced.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use sessionnotes_core::{sort_newest_first, NoteId, SessionNote, SessionNoteDraft};

use crate::error::{BackendError, StoreError};
use crate::service::NoteBackend;

/// Handle to one note collection. Clones share the same collection.
#[derive(Clone)]
pub struct NoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn NoteBackend>,
    state: RwLock<StoreState>,
    loads_in_flight: AtomicUsize,
    issued_loads: AtomicU64,
}

#[derive(Debug, Default)]
struct StoreState {
    notes: Vec<SessionNote>,
    last_error: Option<String>,
    /// Ticket of the newest load whose result replaced `notes`.
    applied_load: u64,
    closed: bool,
    /// Count of creates and removes applied to `notes`.
    mutations: u64,
    /// Mutations applied while a load was outstanding, keyed by their
    /// `mutations` sequence number.
    journal: Vec<(u64, Mutation)>,
}

/// A confirmed change to the list, kept for replay onto in-flight loads.
#[derive(Debug, Clone)]
enum Mutation {
    Inserted(SessionNote),
    Removed(NoteId),
}

impl NoteStore {
    /// Create an empty store backed by `backend`. Call [`NoteStore::load`] to fill it.
    pub fn new(backend: Arc<dyn NoteBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                state: RwLock::new(StoreState::default()),
                loads_in_flight: AtomicUsize::new(0),
                issued_loads: AtomicU64::new(0),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Replace the collection with the service's current list.
    ///
    /// Clears `last_error` up front. When several loads overlap, the most
    /// recently issued one that succeeds decides the list; an older load
    /// settling later does not overwrite it.
    pub async fn load(&self) -> Result<Vec<SessionNote>, StoreError> {
        let (_loading, ticket, issued_at) = {
            let mut state = self.inner.state.write().await;
            if state.closed {
                return Err(StoreError::Closed);
            }
            state.last_error = None;
            let loading = LoadingGuard::enter(&self.inner.loads_in_flight);
            let ticket = self.inner.issued_loads.fetch_add(1, Ordering::SeqCst) + 1;
            (loading, ticket, state.mutations)
        };
        tracing::debug!(ticket, "loading session notes");

        let result = self.inner.backend.list().await;

        let mut state = self.inner.state.write().await;
        let replay = state.mutations_since(issued_at);
        if self.inner.loads_in_flight.load(Ordering::SeqCst) == 1 {
            state.journal.clear();
        }
        match result {
            Ok(mut notes) => {
                if !replay.is_empty() {
                    tracing::debug!(
                        ticket,
                        replayed = replay.len(),
                        "replaying mutations confirmed during load"
                    );
                }
                for mutation in replay {
                    mutation.apply(&mut notes);
                }
                sort_newest_first(&mut notes);
                if state.closed {
                    tracing::debug!(ticket, "store closed; discarding loaded notes");
                    return Ok(notes);
                }
                if ticket > state.applied_load {
                    state.notes = notes;
                    state.applied_load = ticket;
                    tracing::info!(ticket, count = state.notes.len(), "session notes loaded");
                } else {
                    tracing::debug!(
                        ticket,
                        applied = state.applied_load,
                        "newer load already applied; keeping current list"
                    );
                }
                Ok(state.notes.clone())
            }
            Err(err) => Err(state.record_failure("load", err)),
        }
    }

    /// Insert a draft through the service and add the stored note to the list.
    pub async fn create(&self, draft: SessionNoteDraft) -> Result<SessionNote, StoreError> {
        self.begin_mutation().await?;
        tracing::debug!(date = %draft.session_date, "inserting session note");

        let result = self.inner.backend.insert(&draft).await;

        let mut state = self.inner.state.write().await;
        match result {
            Ok(note) => {
                if !state.closed {
                    state.record(&self.inner.loads_in_flight, Mutation::Inserted(note.clone()));
                    tracing::info!(id = %note.id, count = state.notes.len(), "session note added");
                }
                Ok(note)
            }
            Err(err) => Err(state.record_failure("create", err)),
        }
    }

    /// Delete a note through the service and drop it from the list.
    ///
    /// Removing an id that is not in the list is a no-op once the service
    /// confirms.
    pub async fn remove(&self, id: &NoteId) -> Result<(), StoreError> {
        self.begin_mutation().await?;
        tracing::debug!(%id, "deleting session note");

        let result = self.inner.backend.delete(id).await;

        let mut state = self.inner.state.write().await;
        match result {
            Ok(()) => {
                if !state.closed {
                    let before = state.notes.len();
                    state.record(&self.inner.loads_in_flight, Mutation::Removed(id.clone()));
                    let removed = before - state.notes.len();
                    tracing::info!(%id, removed, "session note deleted");
                }
                Ok(())
            }
            Err(err) => Err(state.record_failure("remove", err)),
        }
    }

    /// Tear the store down. Requests still outstanding settle without touching
    /// the list; later calls fail with [`StoreError::Closed`].
    pub async fn close(&self) {
        let mut state = self.inner.state.write().await;
        state.closed = true;
        tracing::debug!("note store closed");
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Owned copy of the current list, newest session first.
    pub async fn snapshot(&self) -> Vec<SessionNote> {
        self.inner.state.read().await.notes.clone()
    }

    pub async fn get(&self, id: &NoteId) -> Option<SessionNote> {
        self.inner
            .state
            .read()
            .await
            .notes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.state.read().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.state.read().await.notes.is_empty()
    }

    /// Message from the most recent failed operation, cleared when the next
    /// operation starts.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.read().await.last_error.clone()
    }

    /// True while at least one [`NoteStore::load`] is outstanding.
    pub fn is_loading(&self) -> bool {
        self.inner.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.state.read().await.closed
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn begin_mutation(&self) -> Result<(), StoreError> {
        let mut state = self.inner.state.write().await;
        if state.closed {
            return Err(StoreError::Closed);
        }
        state.last_error = None;
        Ok(())
    }
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("loads_in_flight", &self.inner.loads_in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl StoreState {
    /// Apply a confirmed mutation, journaling it if a load could still
    /// overwrite the list.
    fn record(&mut self, loads_in_flight: &AtomicUsize, mutation: Mutation) {
        mutation.apply(&mut self.notes);
        self.mutations += 1;
        if loads_in_flight.load(Ordering::SeqCst) > 0 {
            self.journal.push((self.mutations, mutation));
        }
    }

    fn mutations_since(&self, seq: u64) -> Vec<Mutation> {
        self.journal
            .iter()
            .filter(|(n, _)| *n > seq)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn record_failure(&mut self, op: &'static str, err: BackendError) -> StoreError {
        tracing::warn!(op, error = %err, "session note operation failed");
        if !self.closed {
            self.last_error = Some(err.to_string());
        }
        StoreError::Backend(err)
    }
}

impl Mutation {
    fn apply(&self, notes: &mut Vec<SessionNote>) {
        match self {
            Mutation::Inserted(note) => insert_sorted(notes, note.clone()),
            Mutation::Removed(id) => notes.retain(|n| &n.id != id),
        }
    }
}

/// Counts an outstanding load; released on drop so an abandoned load future
/// does not leave the store looking busy.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Add `note` to a list already in collection order, keeping it in order.
///
/// A note whose id is already present replaces the old entry.
pub(crate) fn insert_sorted(notes: &mut Vec<SessionNote>, note: SessionNote) {
    notes.retain(|n| n.id != note.id);
    notes.push(note);
    sort_newest_first(notes);
}
