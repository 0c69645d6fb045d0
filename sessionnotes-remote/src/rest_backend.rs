//! [`NoteBackend`] over a PostgREST-style table endpoint.
//!
//! | operation | request                                                        |
//! |-----------|----------------------------------------------------------------|
//! | list      | `GET  /rest/v1/<table>?select=*&order=session_date.desc`       |
//! | insert    | `POST /rest/v1/<table>` body `[draft]`, `Prefer: return=representation` |
//! | delete    | `DELETE /rest/v1/<table>?id=eq.<id>`                           |

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use sessionnotes_core::{ClientConfig, NoteId, SessionNote, SessionNoteDraft};
use sessionnotes_sync::{BackendError, NoteBackend};

use crate::client::{error_message, RemoteClient, RemoteError};

const ORDER_NEWEST_FIRST: &str = "session_date.desc";

/// Session notes table reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestNoteBackend {
    client: RemoteClient,
    table: String,
}

impl RestNoteBackend {
    pub fn new(client: RemoteClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Backend for the table named in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, RemoteError> {
        Ok(Self::new(RemoteClient::new(config)?, config.table.clone()))
    }

    fn url(&self) -> String {
        self.client.table_url(&self.table)
    }
}

#[async_trait]
impl NoteBackend for RestNoteBackend {
    async fn list(&self) -> Result<Vec<SessionNote>, BackendError> {
        let response = self
            .client
            .get(&self.url())
            .query(&[("select", "*"), ("order", ORDER_NEWEST_FIRST)])
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn insert(&self, draft: &SessionNoteDraft) -> Result<SessionNote, BackendError> {
        let response = self
            .client
            .post(&self.url())
            .header("Prefer", "return=representation")
            .json(&[draft])
            .send()
            .await
            .map_err(transport)?;
        let mut rows: Vec<SessionNote> = read_json(response).await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(BackendError::Decode(format!(
                "insert returned {n} rows, expected exactly 1"
            ))),
        }
    }

    async fn delete(&self, id: &NoteId) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(&self.url())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(transport)?;
        read_status(response).await
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    tracing::debug!(error = %err, "persistence request failed before a response");
    BackendError::Transport(err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

async fn read_status(response: reqwest::Response) -> Result<(), BackendError> {
    read_body(response).await.map(|_| ())
}

/// Body of a successful response, or the status error built from a failed one.
async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(body)
}
