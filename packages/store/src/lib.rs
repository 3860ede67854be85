//! # CVflow Store
//!
//! Centralized, observable state container for one CV document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: pure document types                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: document lifecycle + mutations       │
//! │  - Apply mutations (total, no-op on bad    │
//! │    targets)                                 │
//! │  - Persistent updates: new Arc spine per    │
//! │    commit, siblings shared                  │
//! │  - Snapshot persistence on every commit     │
//! │  - watch-channel change notification        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ preview: Arc<Cv> → paginated artifact       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cvflow_store::{CvStore, MemoryStorage, Mutation, STORE_NAME};
//! use cvflow_model::Section;
//! use std::sync::Arc;
//!
//! let mut store = CvStore::open(MemoryStorage::new(), STORE_NAME);
//! let mut changes = store.subscribe();
//!
//! store.apply(Mutation::AddSection {
//!     section: Arc::new(Section::list("Skills", vec![])),
//!     index: None,
//! });
//! assert_eq!(changes.borrow_and_update().sections.len(), 1);
//! ```

mod errors;
mod mutations;
mod persist;
mod store;

pub use errors::StoreError;
pub use mutations::Mutation;
pub use persist::{
    FileStorage, MemoryStorage, Snapshot, SnapshotStorage, STORE_NAME, STORE_VERSION,
};
pub use store::CvStore;

// Re-export the model for convenience
pub use cvflow_model as model;
