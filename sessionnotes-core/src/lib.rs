//! Session notes core library: domain types, draft validation, client config, errors.
//!
//! - [`types`]: note, draft and id types, collection ordering
//! - [`validation`]: structural checks run before any network call
//! - [`config`]: `~/.sessionnotes/config.yaml` load / save
//! - [`error`]: [`ValidationError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::ClientConfig;
pub use error::{ConfigError, DraftField, FieldViolation, ValidationError};
pub use types::{newest_first, sort_newest_first, NoteId, SessionNote, SessionNoteDraft};
pub use validation::{parse_session_date, validate_draft};
