//! Session providers for the graph store
//!
//! A request takes one session for its whole duration and drops it on every
//! exit path. Read sessions may be held concurrently; a write session is
//! exclusive.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{TraceError, TraceResult};
use crate::graph::GraphStore;
use crate::loader::Dataset;

pub type ReadSession<'a> = RwLockReadGuard<'a, GraphStore>;
pub type WriteSession<'a> = RwLockWriteGuard<'a, GraphStore>;

/// Hands out store sessions to analytic requests.
///
/// Implementations own connection handling; failing to provide a session is
/// reported as `StoreUnavailable`.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Acquire a shared, read-only session
    async fn read_session<'a>(&'a self) -> TraceResult<ReadSession<'a>>;

    /// Acquire an exclusive session for reads and writes
    async fn write_session<'a>(&'a self) -> TraceResult<WriteSession<'a>>;
}

/// In-process backend over a shared store
pub struct InMemoryBackend {
    store: Arc<RwLock<GraphStore>>,
    online: AtomicBool,
}

impl InMemoryBackend {
    /// Backend over a fresh empty store
    pub fn new() -> Self {
        Self::with_store(Arc::new(RwLock::new(GraphStore::new())))
    }

    /// Backend wrapping an existing shared store
    pub fn with_store(store: Arc<RwLock<GraphStore>>) -> Self {
        Self {
            store,
            online: AtomicBool::new(true),
        }
    }

    /// Backend over a store holding only `dataset`
    pub fn from_dataset(dataset: &Dataset) -> TraceResult<Self> {
        let store = dataset.into_store()?;
        Ok(Self::with_store(Arc::new(RwLock::new(store))))
    }

    /// The shared store, for direct setup outside of a session
    pub fn store(&self) -> &Arc<RwLock<GraphStore>> {
        &self.store
    }

    /// Take the backend offline or back online
    ///
    /// While offline every session request fails.
    pub fn set_online(&self, online: bool) {
        debug!("Backend {}", if online { "online" } else { "offline" });
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> TraceResult<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(TraceError::StoreUnavailable("backend is offline".to_string()))
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphBackend for InMemoryBackend {
    async fn read_session<'a>(&'a self) -> TraceResult<ReadSession<'a>> {
        self.ensure_online()?;
        Ok(self.store.read().await)
    }

    async fn write_session<'a>(&'a self) -> TraceResult<WriteSession<'a>> {
        self.ensure_online()?;
        Ok(self.store.write().await)
    }
}
