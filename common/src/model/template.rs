use serde::{Deserialize, Serialize};

/// A stored HTML report template.
///
/// `topic` is the lookup key used by the report generator. At most one
/// template per topic carries `active = true`; the store enforces this with a
/// partial unique index and flips the flag through an explicit activation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub topic: String,
    pub description: Option<String>,
    /// Raw HTML body containing `{name}` / `{name:.2f}` placeholders.
    pub content_html: String,
    pub active: bool,
}

/// Payload used to create a template or overwrite an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content_html: String,
    #[serde(default)]
    pub active: bool,
}
