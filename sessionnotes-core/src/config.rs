//! Client configuration file.
//!
//! # Storage layout
//!
//! ```text
//! ~/.sessionnotes/
//!   config.yaml     (mode 0600, carries the API key)
//! ```
//!
//! # API pattern
//!
//! Every filesystem function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable names applied on top of the file.
pub mod env_vars {
    pub const URL: &str = "SESSIONNOTES_URL";
    pub const API_KEY: &str = "SESSIONNOTES_API_KEY";
    pub const TIMEOUT_MS: &str = "SESSIONNOTES_TIMEOUT_MS";
}

/// Default values
pub mod defaults {
    pub const TABLE: &str = "session_notes";
    pub const VALIDATOR_FUNCTION: &str = "validate-session-note";
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
}

/// Connection settings for the persistence service and the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Project URL, e.g. `https://abc.example.co`. No trailing path.
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_validator_function")]
    pub validator_function: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: default_table(),
            validator_function: default_validator_function(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Reject values no client could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key is empty".to_string()));
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Invalid("table is empty".to_string()));
        }
        if self.validator_function.trim().is_empty() {
            return Err(ConfigError::Invalid("validator_function is empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env_vars::URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(key) = lookup(env_vars::API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(raw) = lookup(env_vars::TIMEOUT_MS).filter(|v| !v.trim().is_empty()) {
            self.request_timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{} must be a whole number of milliseconds, got '{raw}'",
                    env_vars::TIMEOUT_MS
                ))
            })?;
        }
        Ok(self)
    }
}

fn default_table() -> String {
    defaults::TABLE.to_string()
}

fn default_validator_function() -> String {
    defaults::VALIDATOR_FUNCTION.to_string()
}

fn default_request_timeout_ms() -> u64 {
    defaults::REQUEST_TIMEOUT_MS
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.sessionnotes/`
pub fn config_dir_at(home: &Path) -> PathBuf {
    home.join(".sessionnotes")
}

/// `<home>/.sessionnotes/config.yaml` (pure, no I/O).
pub fn config_path_at(home: &Path) -> PathBuf {
    config_dir_at(home).join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Read the config file exactly as stored, without environment overrides.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path) if malformed YAML.
pub fn read_at(home: &Path) -> Result<ClientConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// Read the config file, apply environment overrides and validate the result.
pub fn load_at(home: &Path) -> Result<ClientConfig, ConfigError> {
    let config = read_at(home)?.apply_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ClientConfig, ConfigError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save `config` to `<home>/.sessionnotes/config.yaml`.
///
/// Write flow: validate → serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    config.validate()?;

    let dir = config_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let path = config_path_at(home);
    let tmp_path = path.with_file_name("config.yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn sample() -> ClientConfig {
        ClientConfig::new("https://notes.example.co", "anon-key")
    }

    #[test]
    fn config_path_is_correct() {
        let home = make_home();
        let path = config_path_at(home.path());
        assert!(path.ends_with(".sessionnotes/config.yaml"));
    }

    #[test]
    fn save_and_read_roundtrip() {
        let home = make_home();
        save_at(home.path(), &sample()).expect("save");
        let loaded = read_at(home.path()).expect("read");
        assert_eq!(loaded, sample());
    }

    #[test]
    fn saved_file_is_private() {
        let home = make_home();
        let path = save_at(home.path(), &sample()).expect("save");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).expect("meta").permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
        let tmp = path.with_file_name("config.yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let home = make_home();
        let dir = config_dir_at(home.path());
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(
            dir.join("config.yaml"),
            "base_url: https://notes.example.co\napi_key: k\n",
        )
        .expect("write");

        let loaded = read_at(home.path()).expect("read");
        assert_eq!(loaded.table, defaults::TABLE);
        assert_eq!(loaded.validator_function, defaults::VALIDATOR_FUNCTION);
        assert_eq!(loaded.request_timeout_ms, defaults::REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (env_vars::URL, "http://127.0.0.1:54321"),
            (env_vars::TIMEOUT_MS, "2500"),
        ]);
        let cfg = sample()
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .expect("overrides");
        assert_eq!(cfg.base_url, "http://127.0.0.1:54321");
        assert_eq!(cfg.api_key, "anon-key");
        assert_eq!(cfg.request_timeout_ms, 2500);
    }

    #[test]
    fn bad_timeout_override_is_invalid() {
        let err = sample()
            .apply_overrides(|k| (k == env_vars::TIMEOUT_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
    }

    #[test]
    fn save_refuses_invalid_config() {
        let home = make_home();
        let cfg = ClientConfig::new("notes.example.co", "k");
        let err = save_at(home.path(), &cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(!config_path_at(home.path()).exists());
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
