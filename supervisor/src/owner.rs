//! Single-owner coordination across supervisor instances.
//!
//! Multiple supervisor instances (one per editor window) share one hub; the
//! coordinator decides which instance issues start/stop calls. The persisted
//! token store is the serialization point: the coordinator adds no lock of
//! its own, so the store's compare-and-swap guarantee bounds correctness.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Key under which the active owner token is persisted.
pub const OWNER_KEY: &str = "hub.owner";

/// Key-value persistence with atomic compare-and-swap per key.
///
/// Injected by the embedding integration (editor session state, a small
/// database, ...). `compare_and_swap` must be atomic with respect to
/// concurrent callers; `None` means "no value".
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Replace the value iff it currently equals `expected`.
    /// Returns true when the swap happened.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> bool;
}

/// In-process store for tests and single-instance embedding.
#[derive(Default)]
pub struct MemoryOwnershipStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnershipStore for MemoryOwnershipStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.get(key).map(String::as_str) != expected {
            return false;
        }
        match new {
            Some(value) => entries.insert(key.to_string(), value.to_string()),
            None => entries.remove(key),
        };
        true
    }
}

/// Arbitrates which supervisor instance owns the shared hub.
#[derive(Clone)]
pub struct Coordinator {
    store: Arc<dyn OwnershipStore>,
    key: String,
}

impl Coordinator {
    pub fn new(store: Arc<dyn OwnershipStore>) -> Self {
        Self {
            store,
            key: OWNER_KEY.to_string(),
        }
    }

    /// The instance id currently holding the token, if any.
    pub async fn current_owner(&self) -> Option<String> {
        self.store.get(&self.key).await
    }

    /// Try to become the owner.
    ///
    /// Succeeds iff no owner is recorded, the recorded owner is this
    /// candidate, or the hub is not actually running (`hub_running` is the
    /// caller's fresh `is_running()` observation, covering an owner that
    /// crashed without releasing). The swap is keyed on the owner value
    /// observed here, so losing a concurrent claim yields a clean decline.
    pub async fn try_claim(&self, candidate_id: &str, hub_running: bool) -> bool {
        let current = self.store.get(&self.key).await;

        if current.as_deref() == Some(candidate_id) {
            return true;
        }
        if current.is_some() && hub_running {
            debug!(candidate_id, "declining claim, another owner is active");
            return false;
        }

        let claimed = self
            .store
            .compare_and_swap(&self.key, current.as_deref(), Some(candidate_id))
            .await;
        if claimed {
            info!(candidate_id, "claimed hub ownership");
        } else {
            debug!(candidate_id, "lost claim race");
        }
        claimed
    }

    /// Clear the token, but only if this candidate still holds it; a late
    /// release must not clobber a newer owner.
    pub async fn release(&self, candidate_id: &str) -> bool {
        let released = self
            .store
            .compare_and_swap(&self.key, Some(candidate_id), None)
            .await;
        if released {
            info!(candidate_id, "released hub ownership");
        }
        released
    }
}
