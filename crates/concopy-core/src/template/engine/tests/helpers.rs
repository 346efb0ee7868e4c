//! Shared test helpers for template engine tests

use crate::template::engine::TemplateContext;
use serde_json::json;

/// Create a page-shaped context with HTML-significant characters
pub(super) fn page_context() -> TemplateContext {
    TemplateContext::new(json!({
        "title": "Fish & <Chips>",
        "url": "https://ex.com/?a=1&b=2",
        "selection": "",
        "count": 42,
        "ratio": 0.5,
        "enabled": true,
        "meta": {
            "description": "Tasty \"food\"",
            "author": null
        },
        "tags": ["a", "b"]
    }))
}
