//! Wiring shared by the commands that talk to the remote services.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};

use sessionnotes_core::{config, ClientConfig};
use sessionnotes_remote::{FunctionValidator, RemoteClient, RestNoteBackend};
use sessionnotes_sync::{CreationPipeline, DeleteConfirmation, NoteStore};

/// One store with its creation and deletion flows, all over the same client.
pub struct Session {
    pub store: NoteStore,
    pub pipeline: CreationPipeline,
    pub deletion: DeleteConfirmation,
}

impl Session {
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let client = RemoteClient::new(config).context("failed to build HTTP client")?;
        let backend = RestNoteBackend::new(client.clone(), config.table.clone());
        let validator = FunctionValidator::new(client, config.validator_function.clone());
        tracing::debug!(base_url = %config.base_url, table = %config.table, "session connected");

        let store = NoteStore::new(Arc::new(backend));
        Ok(Self {
            pipeline: CreationPipeline::new(store.clone(), Arc::new(validator)),
            deletion: DeleteConfirmation::new(store.clone()),
            store,
        })
    }

    /// Stop accepting work. Pending completions no longer touch the list.
    pub async fn close(self) {
        self.store.close().await;
    }
}

/// Load `~/.sessionnotes/config.yaml` with environment overrides applied.
pub fn load_config() -> Result<ClientConfig> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    config::load_at(&home).context("failed to load client configuration")
}

/// Run `fut` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(fut))
}
