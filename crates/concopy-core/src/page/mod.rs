//! Page context - immutable snapshot of a web page
//!
//! A `PageContext` is produced once per execution request by a page context
//! provider (see [`html`] for the bundled one) and is read-only to the
//! execution engine.

pub mod html;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::template::TemplateContext;

/// Metadata collected from `<meta>` tags, keyed by name or property
pub type PageMeta = BTreeMap<String, Option<String>>;

/// Meta keys every provider normalizes
pub const NORMALIZED_META_KEYS: [&str; 3] = ["description", "keywords", "author"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub selection: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub meta: PageMeta,
}

impl PageContext {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), Some(value.into()));
        self
    }

    /// Meta value for `key`, if present
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(|v| v.as_deref())
    }

    /// Non-empty meta description
    pub fn description(&self) -> Option<&str> {
        self.meta("description").filter(|d| !d.is_empty())
    }

    /// Build the renderer data mapping for this page
    ///
    /// Top-level keys are `title`, `url`, `selection`, `content` and `meta`;
    /// absent meta values map to `null`, which renders as the empty string.
    pub fn to_template_context(&self) -> TemplateContext {
        let meta: Map<String, Value> = self
            .meta
            .iter()
            .map(|(k, v)| {
                let value = v.clone().map(Value::String).unwrap_or(Value::Null);
                (k.clone(), value)
            })
            .collect();

        let mut data = Map::new();
        data.insert("title".to_string(), Value::String(self.title.clone()));
        data.insert("url".to_string(), Value::String(self.url.clone()));
        data.insert("selection".to_string(), Value::String(self.selection.clone()));
        data.insert("content".to_string(), Value::String(self.content.clone()));
        data.insert("meta".to_string(), Value::Object(meta));

        TemplateContext::new(Value::Object(data))
    }
}

impl From<&PageContext> for TemplateContext {
    fn from(page: &PageContext) -> Self {
        page.to_template_context()
    }
}
