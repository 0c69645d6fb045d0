//! Domain types for session notes.
//!
//! Field names on the wire follow the remote table's columns (`client_name`,
//! `session_date`, `duration`, `created_at`); the Rust names stay descriptive.
//! All types are serializable/deserializable via serde.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier assigned to a note by the persistence service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A candidate note that has not been persisted yet.
///
/// Lives only for the duration of one creation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNoteDraft {
    pub client_name: String,
    pub session_date: NaiveDate,
    pub notes: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i32,
}

/// A note as stored by the persistence service.
///
/// `id` and `created_at` are server-assigned and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNote {
    pub id: NoteId,
    pub client_name: String,
    pub session_date: NaiveDate,
    pub notes: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl SessionNote {
    /// Attach server-assigned fields to an accepted draft.
    pub fn from_draft(draft: SessionNoteDraft, id: NoteId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_name: draft.client_name,
            session_date: draft.session_date,
            notes: draft.notes,
            duration_minutes: draft.duration_minutes,
            created_at,
        }
    }

    /// The user-supplied part of this note.
    pub fn to_draft(&self) -> SessionNoteDraft {
        SessionNoteDraft {
            client_name: self.client_name.clone(),
            session_date: self.session_date,
            notes: self.notes.clone(),
            duration_minutes: self.duration_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Collection order: `session_date` descending, ties broken by `created_at`
/// descending.
pub fn newest_first(a: &SessionNote, b: &SessionNote) -> Ordering {
    b.session_date
        .cmp(&a.session_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort a note list into collection order in place.
pub fn sort_newest_first(notes: &mut [SessionNote]) {
    notes.sort_by(newest_first);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
