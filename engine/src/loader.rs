//! Concurrent retrieval of every manifest entry.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use preloader_types::{AssetManifest, SettleOutcome, Settlement};

use crate::fetch::AssetFetcher;

/// Owns the in-flight retrievals and the channel their settlements arrive on.
///
/// Dropping the loader aborts every retrieval still running.
pub struct AssetLoader {
    tasks: JoinSet<()>,
    rx: mpsc::UnboundedReceiver<Settlement>,
}

impl AssetLoader {
    /// Spawn one task per manifest slot. Must be called inside a tokio runtime.
    pub fn start(manifest: &AssetManifest, fetcher: Arc<dyn AssetFetcher>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();

        for (slot, locator) in manifest.iter().cloned().enumerate() {
            let tx = tx.clone();
            let fetcher = Arc::clone(&fetcher);
            tasks.spawn(async move {
                let result = AssertUnwindSafe(fetcher.fetch(&locator))
                    .catch_unwind()
                    .await;
                let outcome = match result {
                    Ok(Ok(bytes)) => {
                        tracing::debug!(slot, %locator, bytes, "Asset loaded");
                        SettleOutcome::Loaded { bytes }
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(slot, %locator, "Asset failed: {err}");
                        SettleOutcome::failed(err.to_string())
                    }
                    Err(_) => {
                        tracing::warn!(slot, %locator, "Asset fetch panicked");
                        SettleOutcome::failed("fetch panicked")
                    }
                };
                // Receiver gone means the preloader was torn down.
                let _ = tx.send(Settlement { slot, outcome });
            });
        }

        Self { tasks, rx }
    }

    pub fn try_recv(&mut self) -> Option<Settlement> {
        self.rx.try_recv().ok()
    }

    /// Next settlement, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Settlement> {
        self.rx.recv().await
    }

    /// Stop all outstanding retrievals. Safe to call repeatedly.
    pub fn abort(&mut self) {
        self.rx.close();
        self.tasks.abort_all();
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
