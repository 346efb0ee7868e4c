//! Basic rendering tests for template engine

use super::helpers::page_context;
use super::*;
use serde_json::json;

#[test]
fn test_render_simple_placeholder() {
    let context = TemplateContext::new(json!({ "title": "My Title" }));
    assert_eq!(render("Title: {{title}}", &context), "Title: My Title");
}

#[test]
fn test_render_placeholder_with_spaces() {
    let context = TemplateContext::new(json!({ "title": "My Title" }));
    assert_eq!(render("Title: {{ title }}", &context), "Title: My Title");
    assert_eq!(render("Title: {{& title }}", &context), "Title: My Title");
}

#[test]
fn test_render_nested_key() {
    let context = page_context();
    assert_eq!(
        render("{{meta.description}}", &context),
        "Tasty &quot;food&quot;"
    );
}

#[test]
fn test_render_missing_key_is_empty() {
    let context = page_context();
    assert_eq!(render("[{{nonexistent}}]", &context), "[]");
    assert_eq!(render("[{{&meta.missing}}]", &context), "[]");
}

#[test]
fn test_render_null_and_composite_values_are_empty() {
    let context = page_context();
    assert_eq!(render("[{{meta.author}}]", &context), "[]");
    assert_eq!(render("[{{tags}}]", &context), "[]");
    assert_eq!(render("[{{meta}}]", &context), "[]");
}

#[test]
fn test_render_scalar_values() {
    let context = page_context();
    assert_eq!(
        render("{{count}} {{ratio}} {{enabled}}", &context),
        "42 0.5 true"
    );
}

#[test]
fn test_render_multiple_placeholders_left_to_right() {
    let context = TemplateContext::new(json!({ "title": "T", "url": "U" }));
    assert_eq!(render("{{title}} - {{url}} - {{title}}", &context), "T - U - T");
}

#[test]
fn test_render_no_placeholders() {
    let context = page_context();
    let template = "This is plain text with no placeholders.";
    assert_eq!(render(template, &context), template);
}

#[test]
fn test_render_is_idempotent_without_further_tokens() {
    let context = TemplateContext::new(json!({ "title": "<b>" }));
    let once = render("{{title}}!", &context);
    assert_eq!(render(&once, &context), once);
}

#[test]
fn test_render_does_not_rescan_substituted_values() {
    let context = TemplateContext::new(json!({ "title": "{{url}}", "url": "U" }));
    assert_eq!(render("{{&title}}", &context), "{{url}}");
}

#[test]
fn test_render_multibyte_text_around_tokens() {
    let context = TemplateContext::new(json!({ "title": "é" }));
    assert_eq!(render("→ {{title}} ←", &context), "→ é ←");
}
