//! # sessionnotes-sync
//!
//! Client-side synchronization layer for session notes.
//!
//! Build one [`NoteStore`] per application over a [`NoteBackend`], then hand
//! clones of it to a [`CreationPipeline`] (validate, then persist) and a
//! [`DeleteConfirmation`] (select, then confirm).

pub mod deletion;
pub mod error;
mod flight;
pub mod pipeline;
pub mod service;
pub mod store;

pub use deletion::{DeleteConfirmation, DeleteOutcome};
pub use error::{
    BackendError, StoreError, SubmissionError, ValidatorError, VALIDATOR_UNAVAILABLE_MESSAGE,
};
pub use pipeline::CreationPipeline;
pub use service::{DraftValidator, NoteBackend, ValidationVerdict};
pub use store::NoteStore;
