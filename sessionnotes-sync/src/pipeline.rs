//! Validate-then-persist workflow for new notes.
//!
//! Every creation goes through three steps, strictly in order, each one only
//! if the previous passed:
//!
//! 1. local structural validation (no network)
//! 2. one call to the remote validator
//! 3. one insert through [`NoteStore::create`]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sessionnotes_core::{validate_draft, SessionNote, SessionNoteDraft};

use crate::error::SubmissionError;
use crate::flight::FlightGuard;
use crate::service::{DraftValidator, ValidationVerdict};
use crate::store::NoteStore;

/// Gate in front of [`NoteStore::create`]. One submission at a time.
pub struct CreationPipeline {
    store: NoteStore,
    validator: Arc<dyn DraftValidator>,
    submitting: AtomicBool,
}

impl CreationPipeline {
    pub fn new(store: NoteStore, validator: Arc<dyn DraftValidator>) -> Self {
        Self {
            store,
            validator,
            submitting: AtomicBool::new(false),
        }
    }

    /// Run the workflow for one draft.
    ///
    /// The draft is consumed: it is discarded on failure and turned into the
    /// stored note on success. A call made while another is still outstanding
    /// fails with [`SubmissionError::InFlight`] and sends nothing.
    pub async fn submit(&self, draft: SessionNoteDraft) -> Result<SessionNote, SubmissionError> {
        validate_draft(&draft)?;

        let _submitting =
            FlightGuard::acquire(&self.submitting).ok_or(SubmissionError::InFlight)?;

        tracing::debug!(date = %draft.session_date, "validating session note remotely");
        match self.validator.validate(&draft).await {
            Ok(ValidationVerdict::Accepted) => {}
            Ok(ValidationVerdict::Rejected { message }) => {
                tracing::info!(reason = %message, "validator rejected session note");
                return Err(SubmissionError::Rejected { message });
            }
            Err(source) => {
                tracing::warn!(error = %source, "validation service unavailable");
                return Err(SubmissionError::ValidatorUnavailable { source });
            }
        }

        Ok(self.store.create(draft).await?)
    }

    /// True while a [`CreationPipeline::submit`] call is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }
}
