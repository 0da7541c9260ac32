// ABOUTME: Normalized remote-resource record produced by every integration
// ABOUTME: Providers map their raw payloads into this shape; items are never persisted

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized view of a single remote resource (a CRM contact, a workspace
/// page, a database, ...). Produced fresh on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationItem {
    /// Provider-scoped identifier, copied through verbatim.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider type tag ("contact", "page", "database", ...).
    #[serde(rename = "type")]
    pub item_type: String,
    /// Identifier of the containing resource, when the provider exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Human-readable parent reference (e.g. a company name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path_or_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
    /// Canonical URL of the resource in the provider's UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the resource contains other resources.
    pub directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub visibility: bool,
}

impl IntegrationItem {
    /// Create an item with the required fields; optional metadata defaults
    /// to absent, visibility to true.
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type: item_type.into(),
            parent_id: None,
            parent_path_or_name: None,
            creation_time: None,
            last_modified_time: None,
            url: None,
            directory: false,
            children: None,
            mime_type: None,
            visibility: true,
        }
    }
}
