//! Template engine implementation

mod helpers;
mod tokenize;

use serde_json::Value;

use helpers::{resolve_key, stringify_value};
use tokenize::{TokenKind, TokenStream};

pub use helpers::escape_html;

/// Template context holding JSON data for rendering
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    data: Value,
}

impl TemplateContext {
    /// Create a new template context from a JSON value
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Get the underlying JSON value
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Look up a (possibly dotted) key and stringify it
    ///
    /// Missing keys and non-scalar values yield the empty string.
    pub fn lookup(&self, key: &str) -> String {
        resolve_key(&self.data, key)
            .map(stringify_value)
            .unwrap_or_default()
    }
}

/// Template engine for rendering `{{key}}` / `{{&key}}` templates
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self
    }

    /// Render a template with the given context
    ///
    /// Substitutes tokens left to right in a single pass; substituted values
    /// are never rescanned for placeholders.
    pub fn render(&self, template: &str, context: &TemplateContext) -> String {
        let mut output = String::with_capacity(template.len());
        let mut pos = 0;

        for token in TokenStream::new(template) {
            output.push_str(&template[pos..token.start]);

            let value = context.lookup(token.kind.key());
            match token.kind {
                TokenKind::Escaped { .. } => output.push_str(&escape_html(&value)),
                TokenKind::Raw { .. } => output.push_str(&value),
            }

            pos = token.start + token.length;
        }

        output.push_str(&template[pos..]);
        output
    }
}

/// Convenience function to render a template
pub fn render(template: &str, context: &TemplateContext) -> String {
    TemplateEngine::new().render(template, context)
}

#[cfg(test)]
mod tests;
