//! Error types for sessionnotes-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Draft fields that local validation can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    ClientName,
    SessionDate,
    Notes,
    Duration,
}

impl DraftField {
    /// Column name used by the remote table and the CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::ClientName => "client_name",
            DraftField::SessionDate => "session_date",
            DraftField::Notes => "notes",
            DraftField::Duration => "duration",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: DraftField,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Client-side structural validation failure. Never involves the network.
///
/// Holds at most one violation per field, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid session note: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: DraftField, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                message: message.into(),
            }],
        }
    }

    /// Message for `field`, if that field was rejected.
    pub fn message_for(&self, field: DraftField) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn has_field(&self, field: DraftField) -> bool {
        self.message_for(field).is_some()
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// All errors that can arise from reading or writing the client config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.sessionnotes/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}; run `sessionnotes config init` first")]
    NotFound { path: PathBuf },

    /// A config value is present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}
