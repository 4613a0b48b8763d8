//! Persisted stores backing the engine
//!
//! Each store keeps its whole collection in memory and rewrites the backing
//! document after every mutation. A persistence failure is logged and the
//! in-memory state stays authoritative for the rest of the session.

mod logs;
mod notifications;
mod rules;
mod scheduled;
mod settings;
mod templates;

pub use logs::LogStore;
pub use notifications::NotificationStore;
pub use rules::RuleStore;
pub use scheduled::{ScheduledNotification, ScheduledStore};
pub use settings::SettingsStore;
pub use templates::{default_templates, TemplateStore};

use qarz_core::Result;
use qarz_db::KvBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One JSON document under a fixed key, cached in memory
pub struct JsonStore<D> {
    key: &'static str,
    backend: Arc<dyn KvBackend>,
    state: Mutex<D>,
}

impl<D> JsonStore<D>
where
    D: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Load the document, starting empty if it is missing or unreadable
    pub async fn load(key: &'static str, backend: Arc<dyn KvBackend>) -> Self {
        Self::load_or(key, backend, D::default()).await
    }

    /// Load the document, starting from `fallback` if it is missing or unreadable
    pub async fn load_or(key: &'static str, backend: Arc<dyn KvBackend>, fallback: D) -> Self {
        let state = match read_document(backend.as_ref(), key).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(key, "No stored document, starting fresh");
                fallback
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to load stored document, starting fresh");
                fallback
            }
        };

        Self {
            key,
            backend,
            state: Mutex::new(state),
        }
    }

    /// Re-read the document from the backend without touching the cache
    pub async fn load_all(&self) -> Result<D> {
        Ok(read_document(self.backend.as_ref(), self.key)
            .await?
            .unwrap_or_default())
    }

    /// Copy of the cached document
    pub async fn snapshot(&self) -> D {
        self.state.lock().await.clone()
    }

    /// Replace the document and rewrite it
    pub async fn save_all(&self, doc: D) {
        let mut state = self.state.lock().await;
        *state = doc;
        self.flush(&state).await;
    }

    /// Read-modify-write under one critical section, then rewrite the document
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let mut state = self.state.lock().await;
        let out = f(&mut state);
        self.flush(&state).await;
        out
    }

    async fn flush(&self, doc: &D) {
        let bytes = match serde_json::to_vec(doc) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = self.key, error = %e, "Failed to encode document");
                return;
            }
        };

        if let Err(e) = self.backend.set(self.key, &bytes).await {
            warn!(key = self.key, error = %e, "Failed to persist document, keeping in-memory state");
        }
    }
}

async fn read_document<D: DeserializeOwned>(backend: &dyn KvBackend, key: &str) -> Result<Option<D>> {
    match backend.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}
