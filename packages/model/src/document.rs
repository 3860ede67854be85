//! Core document types.
//!
//! The serialized shape matches the persisted snapshot format: sections
//! carry a `type` discriminant (`EntitiesSection` / `ItemsSection` /
//! `ListSection`) next to their base fields.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root aggregate: the full CV document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cv {
    pub meta: Meta,
    pub header: Header,
    pub sections: Vec<Arc<Section>>,
}

impl Default for Cv {
    fn default() -> Self {
        Self {
            meta: Meta::default(),
            header: Header::default(),
            sections: Vec::new(),
        }
    }
}

/// Document metadata (export filename, optional locale hint).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            filename: "CV".to_string(),
            locale: None,
        }
    }
}

/// Name plus an ordered list of contact lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Header {
    pub name: String,
    pub contacts: Vec<Contact>,
}

/// One contact line. The label is free text ("email", "phone", ...),
/// duplicates are legal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Contact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            url: None,
        }
    }
}

/// A titled block of the document. `content` determines the section kind;
/// `tags` are free-form classification labels (e.g. `education`,
/// `tech:python`) kept for filtering, not rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub content: SectionContent,
}

impl Section {
    pub fn entities(title: impl Into<String>, entities: Vec<Arc<Entity>>) -> Self {
        Self {
            title: title.into(),
            tags: Vec::new(),
            content: SectionContent::Entities { entities },
        }
    }

    pub fn items(title: impl Into<String>, items: Vec<Arc<Role>>) -> Self {
        Self {
            title: title.into(),
            tags: Vec::new(),
            content: SectionContent::Items { items },
        }
    }

    pub fn list(title: impl Into<String>, bullets: Vec<Arc<Bullet>>) -> Self {
        Self {
            title: title.into(),
            tags: Vec::new(),
            content: SectionContent::List { bullets },
        }
    }
}

/// Tagged union over the three section content shapes. Exactly one content
/// field is populated per instance, enforced by construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SectionContent {
    #[serde(rename = "EntitiesSection")]
    Entities { entities: Vec<Arc<Entity>> },

    #[serde(rename = "ItemsSection")]
    Items { items: Vec<Arc<Role>> },

    #[serde(rename = "ListSection")]
    List { bullets: Vec<Arc<Bullet>> },
}

/// An organization/affiliation node containing roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub roles: Vec<Arc<Role>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            roles: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// A position/degree/engagement node containing bullets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub bullets: Vec<Arc<Bullet>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Role {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration: None,
            bullets: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Leaf line item: optional bolded lead-in label plus body text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bullet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub text: String,
}

impl Bullet {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    pub fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            text: text.into(),
        }
    }
}
