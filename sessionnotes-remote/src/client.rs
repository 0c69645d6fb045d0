//! Shared HTTP plumbing for the table endpoint and the validation function.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;

use sessionnotes_core::ClientConfig;

/// Failure building a client from configuration.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Authenticated `reqwest` client bound to one project URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    auth_headers: HeaderMap,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            auth_headers: build_auth_headers(&config.api_key)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/rest/v1/<table>`
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `<base_url>/functions/v1/<function>`
    pub fn function_url(&self, function: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, function)
    }

    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).headers(self.auth_headers.clone())
    }

    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).headers(self.auth_headers.clone())
    }

    pub(crate) fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.delete(url).headers(self.auth_headers.clone())
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn build_auth_headers(api_key: &str) -> Result<HeaderMap, RemoteError> {
    let key = api_key.trim();
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("apikey"),
        HeaderValue::from_str(key).map_err(|e| RemoteError::Config(e.to_string()))?,
    );
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| RemoteError::Config(e.to_string()))?,
    );
    Ok(headers)
}

/// Error body returned by the table endpoint on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Human-readable message for a failed response body.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => match err.details.filter(|d| !d.trim().is_empty()) {
            Some(details) => format!("{} ({details})", err.message),
            None => err.message,
        },
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
