//! Heuristic mapping of free-form source text onto catalog entries
//!
//! An ordered decision table over substring cues; the first matching rule
//! wins. This does not parse program semantics and never fails: anything
//! unrecognized lands on `custom-template`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

use crate::catalog::{CUSTOM_TEMPLATE, MARKDOWN_LINK, RICH_TEXT_LINK, SELECTED_TEXT, TITLE_AND_URL};
use crate::function::{CustomOptions, TEMPLATE_OPTION};

/// Result of classifying source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationOutcome {
    pub template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_options: Option<CustomOptions>,
}

/// One row of the decision table
pub struct Rule {
    pub template_id: &'static str,
    pub matches: fn(&str) -> bool,
}

/// Decision table, in priority order
pub static RULES: [Rule; 4] = [
    Rule {
        template_id: RICH_TEXT_LINK,
        matches: calls_render_with_anchor,
    },
    Rule {
        template_id: MARKDOWN_LINK,
        matches: has_markdown_link,
    },
    Rule {
        template_id: SELECTED_TEXT,
        matches: references_selection,
    },
    Rule {
        template_id: TITLE_AND_URL,
        matches: references_title_and_url,
    },
];

static RENDER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"render\(\s*['"`]([^'"`]+)['"`]"#).expect("valid render literal pattern")
});

static TITLE_CONCAT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"page\.title\s*\+\s*['"`]([^'"`]+)['"`]\s*\+\s*page\.url"#)
        .expect("valid concatenation pattern")
});

fn calls_render_with_anchor(code: &str) -> bool {
    code.contains("render(") && code.contains("<a href=")
}

/// `[` ... `](` ... `)` in that order
fn has_markdown_link(code: &str) -> bool {
    let Some(open) = code.find('[') else {
        return false;
    };
    let rest = &code[open + 1..];
    rest.find("](")
        .is_some_and(|mid| rest[mid + 2..].contains(')'))
}

fn references_selection(code: &str) -> bool {
    code.contains("page.selection")
}

fn references_title_and_url(code: &str) -> bool {
    code.contains("page.title") && code.contains("page.url")
}

/// Classify source text onto a catalog entry
pub fn classify(code: &str) -> ClassificationOutcome {
    if let Some(rule) = RULES.iter().find(|rule| (rule.matches)(code)) {
        tracing::debug!(template_id = rule.template_id, "classified by rule");
        return ClassificationOutcome {
            template_id: rule.template_id.to_string(),
            custom_options: None,
        };
    }

    let custom_options = extract_template(code).map(|template| {
        let mut options = CustomOptions::new();
        options.insert(TEMPLATE_OPTION.to_string(), Value::String(template));
        options
    });
    tracing::debug!(
        extracted = custom_options.is_some(),
        "classified as custom template"
    );

    ClassificationOutcome {
        template_id: CUSTOM_TEMPLATE.to_string(),
        custom_options,
    }
}

/// Best-effort override template for `custom-template`
///
/// A literal first argument to `render(` wins; otherwise a
/// `page.title + "<sep>" + page.url` concatenation becomes
/// `{{title}}<sep>{{url}}`.
pub fn extract_template(code: &str) -> Option<String> {
    if let Some(captures) = RENDER_LITERAL.captures(code) {
        return Some(captures[1].to_string());
    }

    TITLE_CONCAT_URL
        .captures(code)
        .map(|captures| format!("{{{{title}}}}{}{{{{url}}}}", &captures[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::function::custom_template;

    fn template_id(code: &str) -> String {
        classify(code).template_id
    }

    #[test]
    fn test_render_with_anchor_is_rich_text_link() {
        let code = r#"(page) => ({ html: render('<a href="{{&url}}">[{{title}}](x)</a>', page) })"#;
        assert_eq!(template_id(code), RICH_TEXT_LINK);
    }

    #[test]
    fn test_markdown_brackets() {
        assert_eq!(template_id("`[${page.title}](${page.url})`"), MARKDOWN_LINK);
    }

    #[test]
    fn test_brackets_out_of_order_are_not_markdown() {
        assert_eq!(template_id("a ]( b [ c"), CUSTOM_TEMPLATE);
        assert_eq!(template_id("[a](b"), CUSTOM_TEMPLATE);
    }

    #[test]
    fn test_selection_wins_over_title_and_url() {
        let code = "page.title + page.url + page.selection";
        assert_eq!(template_id(code), SELECTED_TEXT);
    }

    #[test]
    fn test_title_and_url() {
        assert_eq!(template_id(r#"page.title + "\n" + page.url"#), TITLE_AND_URL);
    }

    #[test]
    fn test_custom_with_render_literal() {
        let outcome = classify(r#"return { text: render("{{url}} | {{title}}", page) }"#);
        assert_eq!(outcome.template_id, CUSTOM_TEMPLATE);
        assert_eq!(
            custom_template(outcome.custom_options.as_ref()),
            Some("{{url}} | {{title}}")
        );
    }

    #[test]
    fn test_concat_extraction_synthesizes_template() {
        assert_eq!(
            extract_template(r#"page.title + " :: " + page.url"#).as_deref(),
            Some("{{title}} :: {{url}}")
        );
    }

    #[test]
    fn test_custom_without_hints_leaves_options_unset() {
        let outcome = classify("(page) => { return { text: page.content } }");
        assert_eq!(outcome.template_id, CUSTOM_TEMPLATE);
        assert!(outcome.custom_options.is_none());
    }

    #[test]
    fn test_never_panics_on_odd_input() {
        for code in ["", "[", "](", "render(", "\u{0}", "[é](", "render(')"] {
            let _ = classify(code);
        }
    }

    #[test]
    fn test_catalog_sources_classify_to_themselves() {
        for id in [RICH_TEXT_LINK, MARKDOWN_LINK, TITLE_AND_URL, SELECTED_TEXT] {
            let code = catalog::get(id).unwrap().code;
            assert_eq!(template_id(code), id);
        }
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let json = serde_json::to_value(classify("page.selection")).unwrap();
        assert_eq!(json["templateId"], SELECTED_TEXT);
        assert!(json.get("customOptions").is_none());
    }
}
