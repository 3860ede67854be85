//! Error types for the store

use thiserror::Error;

/// Errors surfaced by the snapshot persistence boundary. Mutations
/// themselves never produce errors; invalid targets are no-ops.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
