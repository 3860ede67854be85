//! # CVflow Document Model
//!
//! Pure data types for a CV document: a header with contacts, followed by
//! an ordered list of sections. Sections are a tagged union over three
//! content shapes (entities, standalone roles, or a flat bullet list).
//!
//! ## Referential identity
//!
//! Interior nodes are held behind `Arc`. Every mutation in `cvflow-store`
//! rebuilds the `Arc` spine from the changed node up to the root while
//! untouched siblings keep their prior `Arc`, so downstream consumers can
//! detect change with `Arc::ptr_eq` instead of deep equality.
//!
//! The model itself has no behavior beyond constructors and defaults; all
//! edits go through the `cvflow-store` mutation surface.

mod document;
mod patch;
mod sample;

pub use document::{Bullet, Contact, Cv, Entity, Header, Meta, Role, Section, SectionContent};
pub use patch::{HeaderPatch, MetaPatch, SectionBasePatch};
pub use sample::sample_cv;
