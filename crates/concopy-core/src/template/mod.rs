//! Template module - pure text substitution for copy output
//!
//! ## Syntax
//!
//! - Escaped placeholders: `{{key}}` or `{{ key }}` (HTML-escaped value)
//! - Raw placeholders: `{{&key}}` or `{{& key }}` (value inserted as-is)
//! - Nested access: `{{meta.description}}`
//!
//! Missing keys render as the empty string. Anything that is not a
//! well-formed placeholder, including an unterminated `{{`, is copied to the
//! output verbatim. Rendering never fails.

pub mod engine;

pub use engine::{escape_html, render, TemplateContext, TemplateEngine};
