//! Collaborator seams: the persistence service and the draft validator.
//!
//! Both are opaque remote services. Implementations live in
//! `sessionnotes-remote`; tests substitute in-memory fakes.

use async_trait::async_trait;

use sessionnotes_core::{NoteId, SessionNote, SessionNoteDraft};

use crate::error::{BackendError, ValidatorError};

/// Tabular store of record for session notes.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    /// Every stored note, requested sorted by `session_date` descending.
    async fn list(&self) -> Result<Vec<SessionNote>, BackendError>;

    /// Store one draft. All-or-nothing; returns the stored row with its
    /// server-assigned `id` and `created_at`.
    async fn insert(&self, draft: &SessionNoteDraft) -> Result<SessionNote, BackendError>;

    /// Delete by id. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: &NoteId) -> Result<(), BackendError>;
}

/// Remote oracle that approves or rejects a draft before it is stored.
#[async_trait]
pub trait DraftValidator: Send + Sync {
    /// One attempt, no retry. `Err` means the validator could not be
    /// consulted, never that it said no.
    async fn validate(&self, draft: &SessionNoteDraft) -> Result<ValidationVerdict, ValidatorError>;
}

/// Answer from a reachable validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted,
    Rejected { message: String },
}

impl ValidationVerdict {
    /// Fallback text when the validator rejects without saying why.
    pub const DEFAULT_REJECTION: &'static str = "Validation failed";

    /// Build a verdict from the validator's `{valid, error?}` reply.
    pub fn from_reply(valid: bool, error: Option<String>) -> Self {
        if valid {
            Self::Accepted
        } else {
            Self::Rejected {
                message: error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| Self::DEFAULT_REJECTION.to_string()),
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}
