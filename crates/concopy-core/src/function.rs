//! Copy function definitions and execution results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form per-function options (e.g. an override template string)
pub type CustomOptions = BTreeMap<String, Value>;

/// Option key holding an override template for `custom-template`
pub const TEMPLATE_OPTION: &str = "template";

/// User-owned copy function definition
///
/// Exactly one of a non-empty `code` or `template_id` drives execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFunction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: i64,
    /// Epoch milliseconds
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_options: Option<CustomOptions>,
}

impl CopyFunction {
    /// Function driven by user source text
    pub fn from_code(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    /// Function driven by a catalog entry
    pub fn from_template(
        id: impl Into<String>,
        name: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template_id: Some(template_id.into()),
            ..Self::default()
        }
    }

    pub fn with_custom_options(mut self, options: CustomOptions) -> Self {
        self.custom_options = Some(options);
        self
    }

    /// Source text, if it is non-blank
    pub fn executable_code(&self) -> Option<&str> {
        Some(self.code.as_str()).filter(|c| !c.trim().is_empty())
    }

    /// Template id, if it is non-empty
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Clipboard-bound output of a copy function
///
/// Callers prefer `html` and fall back to `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl FunctionResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.html.is_none()
    }
}

/// Read the override template from custom options
pub fn custom_template(options: Option<&CustomOptions>) -> Option<&str> {
    options?
        .get(TEMPLATE_OPTION)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_stored_function() {
        let json = r##"{
            "id": "f1",
            "name": "Markdown",
            "description": "",
            "code": "",
            "templateId": "markdown-link",
            "backgroundColor": "#E91E63",
            "createdAt": 1,
            "updatedAt": 2
        }"##;
        let func: CopyFunction = serde_json::from_str(json).unwrap();
        assert_eq!(func.template_id(), Some("markdown-link"));
        assert_eq!(func.executable_code(), None);
        assert_eq!(func.background_color.as_deref(), Some("#E91E63"));
    }

    #[test]
    fn test_blank_code_is_not_executable() {
        let func = CopyFunction::from_code("f", "F", "   \n ");
        assert_eq!(func.executable_code(), None);
    }

    #[test]
    fn test_result_serialization_omits_missing_fields() {
        let json = serde_json::to_string(&FunctionResult::text("x")).unwrap();
        assert_eq!(json, r#"{"text":"x"}"#);
    }

    #[test]
    fn test_custom_template_reads_string_option() {
        let mut options = CustomOptions::new();
        options.insert(TEMPLATE_OPTION.to_string(), Value::from("{{url}}"));
        assert_eq!(custom_template(Some(&options)), Some("{{url}}"));

        options.insert(TEMPLATE_OPTION.to_string(), Value::from(3));
        assert_eq!(custom_template(Some(&options)), None);
        assert_eq!(custom_template(None), None);
    }
}
