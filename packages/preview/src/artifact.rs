//! Artifact builder/decoder boundary.
//!
//! The preview engine treats artifact generation as a black box: some
//! backend turns a document into a paginated binary blob, and some viewer
//! can probe that blob for its page count and first-page aspect ratio.
//! Both steps are asynchronous and may fail; failures are recoverable and
//! never corrupt a previously ready slot.

use cvflow_model::Cv;
use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

/// Failure at the artifact boundary.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("artifact build failed: {0}")]
    Build(String),

    #[error("artifact decode failed: {0}")]
    Decode(String),
}

/// Page metadata probed from a built artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub page_count: usize,
    /// First-page height / width.
    pub aspect_ratio: f64,
}

/// Turns a document into a paginated binary artifact.
///
/// Must be safe to call repeatedly and concurrently: the engine may still
/// have a previous build in flight when it starts the next one.
pub trait ArtifactBuilder: Send + Sync + 'static {
    fn build(&self, doc: Arc<Cv>) -> BoxFuture<'static, Result<Vec<u8>, ArtifactError>>;
}

/// Probes a built artifact for page count and first-page aspect ratio.
pub trait ArtifactDecoder: Send + Sync + 'static {
    fn probe(&self, artifact: &[u8]) -> BoxFuture<'static, Result<PageInfo, ArtifactError>>;
}
