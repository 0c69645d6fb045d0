//! In-memory stand-ins for the persistence service and the validator.
//!
//! Both record every call into a shared [`CallLog`] so tests can assert how
//! many requests were made and in which order. `hold_next_*` parks the next
//! call of that kind until the returned sender fires (or is dropped).

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::oneshot;

use sessionnotes_core::{NoteId, SessionNote, SessionNoteDraft};
use sessionnotes_sync::{
    BackendError, DraftValidator, NoteBackend, ValidationVerdict, ValidatorError,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).expect("timestamp").with_timezone(&Utc)
}

pub fn jane_doe_draft() -> SessionNoteDraft {
    SessionNoteDraft {
        client_name: "Jane Doe".to_string(),
        session_date: date("2024-01-15"),
        notes: "Discussed coping strategies.".to_string(),
        duration_minutes: 50,
    }
}

pub fn draft_on(day: &str) -> SessionNoteDraft {
    SessionNoteDraft {
        session_date: date(day),
        ..jane_doe_draft()
    }
}

pub fn stored(id: &str, day: &str) -> SessionNote {
    SessionNote::from_draft(draft_on(day), NoteId::from(id), ts("2024-01-01T00:00:00Z"))
}

pub fn dates(notes: &[SessionNote]) -> Vec<String> {
    notes.iter().map(|n| n.session_date.to_string()).collect()
}

pub fn ids(notes: &[SessionNote]) -> Vec<String> {
    notes.iter().map(|n| n.id.to_string()).collect()
}

/// Yield to the runtime until `cond` holds. Panics after a bounded number of tries.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

// ---------------------------------------------------------------------------
// Call log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    fn push(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

#[derive(Default)]
struct Holds(Mutex<VecDeque<oneshot::Receiver<()>>>);

impl Holds {
    fn add(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.0.lock().unwrap().push_back(rx);
        tx
    }

    fn take(&self) -> Option<oneshot::Receiver<()>> {
        self.0.lock().unwrap().pop_front()
    }
}

async fn wait_for(hold: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = hold {
        let _ = rx.await;
    }
}

// ---------------------------------------------------------------------------
// Persistence service
// ---------------------------------------------------------------------------

/// Table held in memory. Rows are returned in insertion order, not sorted,
/// so the store's own ordering is what tests observe.
#[derive(Default)]
pub struct FakeBackend {
    rows: Mutex<Vec<SessionNote>>,
    inserted: AtomicUsize,
    fail_list: Mutex<Option<BackendError>>,
    fail_insert: Mutex<Option<BackendError>>,
    fail_delete: Mutex<Option<BackendError>>,
    list_holds: Holds,
    insert_holds: Holds,
    delete_holds: Holds,
    log: CallLog,
}

impl FakeBackend {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn with_rows(log: CallLog, rows: Vec<SessionNote>) -> Self {
        let backend = Self::new(log);
        *backend.rows.lock().unwrap() = rows;
        backend
    }

    pub fn set_rows(&self, rows: Vec<SessionNote>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn rows(&self) -> Vec<SessionNote> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_list(&self, err: Option<BackendError>) {
        *self.fail_list.lock().unwrap() = err;
    }

    pub fn fail_insert(&self, err: Option<BackendError>) {
        *self.fail_insert.lock().unwrap() = err;
    }

    pub fn fail_delete(&self, err: Option<BackendError>) {
        *self.fail_delete.lock().unwrap() = err;
    }

    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        self.list_holds.add()
    }

    pub fn hold_next_insert(&self) -> oneshot::Sender<()> {
        self.insert_holds.add()
    }

    pub fn hold_next_delete(&self) -> oneshot::Sender<()> {
        self.delete_holds.add()
    }
}

#[async_trait]
impl NoteBackend for FakeBackend {
    async fn list(&self) -> Result<Vec<SessionNote>, BackendError> {
        self.log.push("list");
        let hold = self.list_holds.take();
        let result = match self.fail_list.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(self.rows()),
        };
        wait_for(hold).await;
        result
    }

    async fn insert(&self, draft: &SessionNoteDraft) -> Result<SessionNote, BackendError> {
        self.log.push("insert");
        let hold = self.insert_holds.take();
        let result = match self.fail_insert.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => {
                let seq = self.inserted.fetch_add(1, Ordering::SeqCst);
                let note = SessionNote::from_draft(
                    draft.clone(),
                    NoteId::from(format!("n{}", seq + 1)),
                    ts("2024-01-15T10:00:00Z") + Duration::seconds(seq as i64),
                );
                self.rows.lock().unwrap().push(note.clone());
                Ok(note)
            }
        };
        wait_for(hold).await;
        result
    }

    async fn delete(&self, id: &NoteId) -> Result<(), BackendError> {
        self.log.push("delete");
        let hold = self.delete_holds.take();
        let result = match self.fail_delete.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => {
                self.rows.lock().unwrap().retain(|n| &n.id != id);
                Ok(())
            }
        };
        wait_for(hold).await;
        result
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct FakeValidator {
    reply: Mutex<Result<ValidationVerdict, ValidatorError>>,
    holds: Holds,
    log: CallLog,
}

impl FakeValidator {
    pub fn accepting(log: CallLog) -> Self {
        Self {
            reply: Mutex::new(Ok(ValidationVerdict::Accepted)),
            holds: Holds::default(),
            log,
        }
    }

    pub fn rejecting(log: CallLog, message: &str) -> Self {
        let validator = Self::accepting(log);
        validator.reply(Ok(ValidationVerdict::Rejected {
            message: message.to_string(),
        }));
        validator
    }

    pub fn failing(log: CallLog, err: ValidatorError) -> Self {
        let validator = Self::accepting(log);
        validator.reply(Err(err));
        validator
    }

    pub fn reply(&self, reply: Result<ValidationVerdict, ValidatorError>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn hold_next(&self) -> oneshot::Sender<()> {
        self.holds.add()
    }
}

#[async_trait]
impl DraftValidator for FakeValidator {
    async fn validate(
        &self,
        _draft: &SessionNoteDraft,
    ) -> Result<ValidationVerdict, ValidatorError> {
        self.log.push("validate");
        let hold = self.holds.take();
        let reply = self.reply.lock().unwrap().clone();
        wait_for(hold).await;
        reply
    }
}
