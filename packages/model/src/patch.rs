//! Shallow-merge patch payloads.
//!
//! A `None` field keeps the prior value; there is no way to clear an
//! optional field through a patch (replace the whole node for that).

use crate::document::Contact;
use serde::{Deserialize, Serialize};

/// Partial update of [`crate::Meta`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Partial update of [`crate::Header`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeaderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
}

/// Partial update of a section's base fields (title/tags), leaving the
/// content untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionBasePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
