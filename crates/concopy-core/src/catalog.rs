//! Builtin template catalog
//!
//! A fixed, process-wide table of named copy behaviors. Each entry carries
//! its canonical source text (for display and classification only) and a
//! direct evaluator that is a pure function of the page and custom options.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{ConcopyError, Result};
use crate::function::{custom_template, CustomOptions, FunctionResult};
use crate::library::to_markdown_link;
use crate::page::PageContext;
use crate::template::render;

pub const RICH_TEXT_LINK: &str = "rich-text-link";
pub const MARKDOWN_LINK: &str = "markdown-link";
pub const TITLE_AND_URL: &str = "title-and-url";
pub const SELECTED_TEXT: &str = "selected-text";
pub const PAGE_SUMMARY: &str = "page-summary";
pub const CUSTOM_TEMPLATE: &str = "custom-template";

/// Template used by `custom-template` when no override is given
pub const DEFAULT_CUSTOM_TEMPLATE: &str = "{{title}} - {{url}}";

const ANCHOR_TEMPLATE: &str = r#"<a href="{{&url}}">{{title}}</a>"#;

type EvaluateFn = fn(&PageContext, Option<&CustomOptions>) -> FunctionResult;

/// Catalog entry
#[derive(Debug, Clone, Copy)]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Canonical source text; never executed
    pub code: &'static str,
    evaluate: EvaluateFn,
}

impl TemplateDescriptor {
    pub fn evaluate(&self, page: &PageContext, options: Option<&CustomOptions>) -> FunctionResult {
        (self.evaluate)(page, options)
    }
}

static TEMPLATES: [TemplateDescriptor; 6] = [
    TemplateDescriptor {
        id: RICH_TEXT_LINK,
        name: "Rich Text Link",
        description: "Create a rich text link with title and URL",
        code: r#"(page) => {
  return {
    html: render('<a href="{{&url}}">{{title}}</a>', page),
    text: page.title,
  };
}"#,
        evaluate: rich_text_link,
    },
    TemplateDescriptor {
        id: MARKDOWN_LINK,
        name: "Markdown Link",
        description: "Create a markdown-formatted link",
        code: r#"(page) => {
  return {
    text: `[${page.title}](${page.url})`,
  };
}"#,
        evaluate: markdown_link,
    },
    TemplateDescriptor {
        id: TITLE_AND_URL,
        name: "Title and URL",
        description: "Copy page title and URL separately",
        code: r#"(page) => {
  return {
    text: page.title + "\n" + page.url,
  };
}"#,
        evaluate: title_and_url,
    },
    TemplateDescriptor {
        id: CUSTOM_TEMPLATE,
        name: "Custom Template",
        description: "Use a custom template with page data",
        code: r#"(page) => {
  // Custom template - edit this
  const template = "{{title}} - {{url}}";
  return {
    text: render(template, page),
  };
}"#,
        evaluate: custom,
    },
    TemplateDescriptor {
        id: SELECTED_TEXT,
        name: "Selected Text",
        description: "Copy selected text or page title if nothing selected",
        code: r#"(page) => {
  return {
    text: page.selection || page.title,
  };
}"#,
        evaluate: selected_text,
    },
    TemplateDescriptor {
        id: PAGE_SUMMARY,
        name: "Page Summary",
        description: "Create a summary with title, URL, and description",
        code: r#"(page) => {
  const summary = [
    "Title: " + page.title,
    "URL: " + page.url,
  ];

  if (page.meta?.description) {
    summary.push("Description: " + page.meta.description);
  }

  return {
    text: summary.join("\n"),
  };
}"#,
        evaluate: page_summary,
    },
];

static INDEX: LazyLock<HashMap<&'static str, &'static TemplateDescriptor>> =
    LazyLock::new(|| TEMPLATES.iter().map(|t| (t.id, t)).collect());

/// All catalog entries in display order
pub fn templates() -> &'static [TemplateDescriptor] {
    &TEMPLATES
}

/// Look up a catalog entry by id
pub fn get(id: &str) -> Option<&'static TemplateDescriptor> {
    INDEX.get(id).copied()
}

/// Look up and evaluate a catalog entry
///
/// # Errors
///
/// Returns `UnknownTemplate` if `id` names no entry
pub fn execute(
    id: &str,
    page: &PageContext,
    options: Option<&CustomOptions>,
) -> Result<FunctionResult> {
    let template = get(id).ok_or_else(|| ConcopyError::UnknownTemplate(id.to_string()))?;
    Ok(template.evaluate(page, options))
}

fn rich_text_link(page: &PageContext, _: Option<&CustomOptions>) -> FunctionResult {
    let html = render(ANCHOR_TEMPLATE, &page.to_template_context());
    FunctionResult::text(page.title.clone()).with_html(html)
}

fn markdown_link(page: &PageContext, _: Option<&CustomOptions>) -> FunctionResult {
    FunctionResult::text(to_markdown_link(&page.title, &page.url))
}

fn title_and_url(page: &PageContext, _: Option<&CustomOptions>) -> FunctionResult {
    FunctionResult::text(format!("{}\n{}", page.title, page.url))
}

fn selected_text(page: &PageContext, _: Option<&CustomOptions>) -> FunctionResult {
    if page.selection.is_empty() {
        FunctionResult::text(page.title.clone())
    } else {
        FunctionResult::text(page.selection.clone())
    }
}

fn page_summary(page: &PageContext, _: Option<&CustomOptions>) -> FunctionResult {
    let mut summary = vec![format!("Title: {}", page.title), format!("URL: {}", page.url)];

    if let Some(description) = page.description() {
        summary.push(format!("Description: {}", description));
    }

    FunctionResult::text(summary.join("\n"))
}

fn custom(page: &PageContext, options: Option<&CustomOptions>) -> FunctionResult {
    let template = custom_template(options).unwrap_or(DEFAULT_CUSTOM_TEMPLATE);
    FunctionResult::text(render(template, &page.to_template_context()))
}
