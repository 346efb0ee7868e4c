//! Page and function fixtures

use serde_json::{json, Value};

/// Title of every fixture page
pub const PAGE_TITLE: &str = "Example Domain";

/// URL of every fixture page
pub const PAGE_URL: &str = "https://example.com/docs/";

/// Page context JSON with selection and normalized meta
pub fn page_json() -> Value {
    json!({
        "title": PAGE_TITLE,
        "url": PAGE_URL,
        "selection": "selected words",
        "content": "Example body text.",
        "meta": {
            "description": "An example page",
            "keywords": null,
            "author": "Ann"
        }
    })
}

/// Page context JSON with only title and url
pub fn bare_page_json() -> Value {
    json!({ "title": PAGE_TITLE, "url": PAGE_URL })
}

/// HTML document that parses to the same title and meta as [`page_json`]
pub const PAGE_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <title>Example Domain</title>
    <meta property="og:description" content="An example page">
    <meta name="article:author" content="Ann">
    <style>body { color: red; }</style>
  </head>
  <body>
    <h1>Example   body</h1>
    <script>var hidden = "nope";</script>
    <p>text.</p>
  </body>
</html>"#;

/// User source that builds a markdown link
pub const MARKDOWN_SOURCE: &str = "(page) => {\n  return {\n    text: `[${page.title}](${page.url})`,\n  };\n}";

/// User source with no return object
pub const MISSING_RETURN_SOURCE: &str = "(page) => {\n  const text = page.title;\n}";

/// A stored copy function driven by user source
pub fn code_function_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Markdown (code)",
        "description": "Markdown link from source",
        "code": MARKDOWN_SOURCE,
        "createdAt": 1_700_000_000_000_i64,
        "updatedAt": 1_700_000_000_000_i64
    })
}

/// A stored copy function driven by a catalog entry
pub fn template_function_json(id: &str, template_id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Template {template_id}"),
        "description": "",
        "code": "",
        "templateId": template_id,
        "backgroundColor": "#E91E63",
        "textColor": "#FFFFFF",
        "createdAt": 1_700_000_000_000_i64,
        "updatedAt": 1_700_000_000_000_i64
    })
}

/// Store document holding the given functions
pub fn store_json(functions: Vec<Value>) -> Value {
    json!({
        "functions": functions,
        "settings": { "theme": "auto" }
    })
}
