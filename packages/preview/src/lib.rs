//! # CVflow Preview
//!
//! Live preview engine for CVflow documents. Subscribes to a document
//! watch channel (typically `CvStore::subscribe` from `cvflow-store`),
//! debounces edit bursts, renders into the hidden one of two buffer
//! slots, and crossfades the fresh artifact to the front:
//!
//! ```text
//!
//!   edits ──▶ settle timer ──▶ build + probe ──▶ hidden slot
//!                (200ms)          (async)            │
//!                                                crossfade (300ms)
//!                                                    │
//!   frames ◀── publish ◀── commit front, release old slot
//!
//! ```
//!
//! The artifact backend is pluggable through [`ArtifactBuilder`] and
//! [`ArtifactDecoder`]; the engine never inspects artifact bytes itself.

pub mod artifact;
pub mod engine;
pub mod layout;

pub use artifact::{ArtifactBuilder, ArtifactDecoder, ArtifactError, PageInfo};
pub use engine::{LivePreview, PreviewFrame, PreviewOptions, SlotId, SlotView};
pub use layout::{DEFAULT_CONTAINER_WIDTH, FALLBACK_ASPECT_RATIO};
