//! Error types for sessionnotes-sync.

use thiserror::Error;

use sessionnotes_core::ValidationError;

/// Failure reported by a persistence service implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service could not be reached or the connection failed mid-request.
    #[error("persistence service unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("persistence service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The service answered, but the body did not match the expected shape.
    #[error("unexpected response from persistence service: {0}")]
    Decode(String),
}

/// Failure talking to the validation service. Distinct from a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    /// The validator could not be reached, timed out, or dropped the connection.
    #[error("validator unreachable: {0}")]
    Transport(String),

    /// The validator answered with a non-success status.
    #[error("validator returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The validator answered with a body that is not a verdict.
    #[error("invalid response from validation service: {0}")]
    InvalidResponse(String),
}

/// All errors surfaced by [`crate::NoteStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The persistence call failed; the in-memory list was left unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The store was closed; no request was sent.
    #[error("note store is closed")]
    Closed,
}

/// Message shown when the validator cannot be consulted.
pub const VALIDATOR_UNAVAILABLE_MESSAGE: &str =
    "Validation service unavailable. Please try again later.";

/// All errors surfaced by [`crate::CreationPipeline::submit`].
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Local structural validation failed; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The validator explicitly rejected the draft. Message is passed through verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// The validator could not be consulted.
    #[error("{}", VALIDATOR_UNAVAILABLE_MESSAGE)]
    ValidatorUnavailable {
        #[source]
        source: ValidatorError,
    },

    /// Validation passed but the insert failed.
    #[error("failed to save session note: {0}")]
    Persistence(#[from] StoreError),

    /// Another submission on this pipeline has not settled yet.
    #[error("a submission is already in progress")]
    InFlight,
}

impl SubmissionError {
    /// True when the user can fix the problem by editing the draft.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Rejected { .. })
    }
}
