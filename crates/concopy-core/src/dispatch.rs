//! Execution dispatcher
//!
//! Chooses between the two execution paths of a copy function: user source
//! through the [`Extractor`], or a catalog entry by template id. Every call
//! is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::classify::classify;
use crate::error::{ConcopyError, Result};
use crate::extract::Extractor;
use crate::function::{CopyFunction, FunctionResult};
use crate::page::PageContext;

pub use crate::eval::FallbackPolicy;

/// Engine knobs, read from the `[engine]` config section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub fallback: FallbackPolicy,
    /// Map unparseable source onto the catalog instead of failing
    pub classify_fallback: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    options: EngineOptions,
    extractor: Extractor,
}

impl Executor {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            extractor: Extractor::new(options.fallback),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Execute a copy function against a page
    ///
    /// Non-blank `code` wins over `template_id`.
    ///
    /// # Errors
    ///
    /// - `ExecutionFailed` wrapping the extractor or catalog error
    /// - `NoExecutableFunction` if there is neither code nor a template id
    pub fn execute(&self, func: &CopyFunction, page: &PageContext) -> Result<FunctionResult> {
        if let Some(code) = func.executable_code() {
            tracing::debug!(function = %func.id, "executing user source");
            return self.execute_code(code, page).map_err(ConcopyError::execution_failed);
        }

        if let Some(template_id) = func.template_id() {
            tracing::debug!(function = %func.id, template_id, "executing catalog entry");
            return catalog::execute(template_id, page, func.custom_options.as_ref())
                .map_err(ConcopyError::execution_failed);
        }

        Err(ConcopyError::NoExecutableFunction)
    }

    fn execute_code(&self, code: &str, page: &PageContext) -> Result<FunctionResult> {
        match self.extractor.extract(code, page) {
            Err(err @ (ConcopyError::InvalidFormat | ConcopyError::MissingReturn))
                if self.options.classify_fallback =>
            {
                let outcome = classify(code);
                tracing::debug!(
                    reason = err.code(),
                    template_id = %outcome.template_id,
                    "source not recognized, using classified catalog entry"
                );
                catalog::execute(&outcome.template_id, page, outcome.custom_options.as_ref())
            }
            other => other,
        }
    }
}

/// Execute with default engine options
pub fn execute_copy_function(func: &CopyFunction, page: &PageContext) -> Result<FunctionResult> {
    Executor::default().execute(func, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MARKDOWN_LINK;
    use crate::function::{CustomOptions, TEMPLATE_OPTION};
    use serde_json::Value;

    fn page() -> PageContext {
        PageContext::new("T", "U")
    }

    #[test]
    fn test_template_path() {
        let func = CopyFunction::from_template("f", "F", MARKDOWN_LINK);
        let result = execute_copy_function(&func, &page()).unwrap();
        assert_eq!(result, FunctionResult::text("[T](U)"));
    }

    #[test]
    fn test_no_executable_function() {
        let func = CopyFunction::from_code("f", "F", "");
        let err = execute_copy_function(&func, &page()).unwrap_err();
        assert!(matches!(err, ConcopyError::NoExecutableFunction));
    }

    #[test]
    fn test_empty_template_id_is_not_executable() {
        let mut func = CopyFunction::from_template("f", "F", "");
        func.code = "  ".to_string();
        let err = execute_copy_function(&func, &page()).unwrap_err();
        assert!(matches!(err, ConcopyError::NoExecutableFunction));
    }

    #[test]
    fn test_code_wins_over_template() {
        let mut func = CopyFunction::from_template("f", "F", MARKDOWN_LINK);
        func.code = "(page) => { return { text: page.url } }".to_string();
        let result = execute_copy_function(&func, &page()).unwrap();
        assert_eq!(result, FunctionResult::text("U"));
    }

    #[test]
    fn test_extractor_errors_are_wrapped() {
        let func = CopyFunction::from_code("f", "F", "(page) => { page.title }");
        let err = execute_copy_function(&func, &page()).unwrap_err();
        assert_eq!(err.code(), "EXECUTION_FAILED");
        assert!(matches!(err.root_cause(), ConcopyError::MissingReturn));

        let func = CopyFunction::from_code("f", "F", "page.title");
        let err = execute_copy_function(&func, &page()).unwrap_err();
        assert!(matches!(err.root_cause(), ConcopyError::InvalidFormat));
    }

    #[test]
    fn test_unknown_template_is_wrapped() {
        let func = CopyFunction::from_template("f", "F", "nope");
        let err = execute_copy_function(&func, &page()).unwrap_err();
        assert_eq!(err.code(), "EXECUTION_FAILED");
        assert!(matches!(err.root_cause(), ConcopyError::UnknownTemplate(id) if id == "nope"));
    }

    #[test]
    fn test_custom_options_reach_catalog() {
        let mut options = CustomOptions::new();
        options.insert(TEMPLATE_OPTION.to_string(), Value::from("{{url}}!"));
        let func = CopyFunction::from_template("f", "F", "custom-template").with_custom_options(options);
        let result = execute_copy_function(&func, &page()).unwrap();
        assert_eq!(result, FunctionResult::text("U!"));
    }

    #[test]
    fn test_classify_fallback() {
        let func = CopyFunction::from_code("f", "F", "page.selection || page.title");

        assert!(execute_copy_function(&func, &page()).is_err());

        let executor = Executor::new(EngineOptions {
            classify_fallback: true,
            ..EngineOptions::default()
        });
        let result = executor.execute(&func, &page()).unwrap();
        assert_eq!(result, FunctionResult::text("T"));
    }

    #[test]
    fn test_classify_fallback_keeps_evaluator_errors() {
        let func = CopyFunction::from_code("f", "F", "(page) => { return { text: page.content } }");
        let executor = Executor::new(EngineOptions {
            fallback: FallbackPolicy::Reject,
            classify_fallback: true,
        });
        let err = executor.execute(&func, &page()).unwrap_err();
        assert!(matches!(err.root_cause(), ConcopyError::UnsupportedExpression(_)));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: EngineOptions = toml::from_str("fallback = \"reject\"").unwrap();
        assert_eq!(options.fallback, FallbackPolicy::Reject);
        assert!(!options.classify_fallback);
    }
}
