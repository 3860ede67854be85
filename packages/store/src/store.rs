//! # CV Store
//!
//! Single source of truth for one document. Holds the current `Arc<Cv>`,
//! commits mutations through the persistent-update surface in
//! [`crate::mutations`], writes a snapshot on every commit, and notifies
//! subscribers through a `watch` channel.
//!
//! The store is an explicit, constructible instance: no ambient singleton,
//! so tests can run isolated stores side by side.

use crate::mutations::Mutation;
use crate::persist::{self, SnapshotStorage};
use cvflow_model::Cv;
use std::sync::Arc;
use tokio::sync::watch;

pub struct CvStore<S: SnapshotStorage> {
    name: String,
    storage: S,
    current: Arc<Cv>,
    watch_tx: watch::Sender<Arc<Cv>>,
}

impl<S: SnapshotStorage> CvStore<S> {
    /// Open a store, rehydrating from the named snapshot slot when a
    /// compatible snapshot exists.
    pub fn open(storage: S, name: impl Into<String>) -> Self {
        let name = name.into();
        let current = Arc::new(persist::load(&storage, &name));
        let (watch_tx, _) = watch::channel(current.clone());
        Self {
            name,
            storage,
            current,
            watch_tx,
        }
    }

    /// The current document. Cheap; shares the committed value.
    pub fn cv(&self) -> Arc<Cv> {
        self.current.clone()
    }

    /// Subscribe to commits. The receiver observes the document as of
    /// subscription time and every subsequent effective commit; no-op
    /// mutations produce no notification.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cv>> {
        self.watch_tx.subscribe()
    }

    /// Apply a mutation. Returns `true` when the document changed.
    ///
    /// On an effective commit the new root is persisted and subscribers
    /// are notified. Persistence failures are logged and do not fail the
    /// mutation; the in-memory state is still authoritative.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        let Some(next) = mutation.apply(&self.current) else {
            return false;
        };
        self.current = Arc::new(next);

        if let Err(err) = persist::save(&self.storage, &self.name, &self.current) {
            tracing::warn!(name = %self.name, error = %err, "failed to persist snapshot");
        }

        let _ = self.watch_tx.send(self.current.clone());
        true
    }
}
