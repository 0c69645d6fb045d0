//! HTTP adapters for the session-notes collaborators.
//!
//! [`RestNoteBackend`] talks to the hosted notes table and
//! [`FunctionValidator`] to the hosted validation function. Both share one
//! authenticated [`RemoteClient`].

pub mod client;
pub mod function_validator;
pub mod rest_backend;

pub use client::{RemoteClient, RemoteError};
pub use function_validator::{FunctionValidator, ValidationReply};
pub use rest_backend::RestNoteBackend;
