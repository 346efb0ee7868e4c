//! User-function extraction
//!
//! User source is matched against one fixed shape and never executed:
//!
//! ```text
//! (page) => {
//!   const template = "...";      // optional string constants
//!   return { text: <expr>, html: <expr> };
//! }
//! ```
//!
//! Recognition yields a [`FunctionShape`]; the expressions of a recognized
//! return object are then resolved by the [`Evaluator`].

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ConcopyError, Result};
use crate::eval::scan::{code_offsets, find_matching, find_top_level, literal_end, split_top_level, strip_comments};
use crate::eval::{strip_quotes, Bindings, Evaluator, FallbackPolicy};
use crate::function::FunctionResult;
use crate::page::PageContext;

static ARROW_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\s*page\s*\)\s*=>\s*\{").expect("valid arrow pattern"));

static RETURN_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\breturn\s*\{").expect("valid return pattern"));

static STRING_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*")
        .expect("valid binding pattern")
});

/// Fields of a recognized `return { ... }` object, as expression source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnObject {
    pub text: Option<String>,
    pub html: Option<String>,
    /// String constants declared before the return statement
    pub bindings: Bindings,
}

/// Outcome of matching user source against the function shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionShape {
    InvalidFormat,
    MissingReturn,
    Recognized(ReturnObject),
}

/// Match user source against `(page) => { ... return { ... } }`
pub fn recognize(code: &str) -> FunctionShape {
    let source = strip_comments(code);
    let source = source.trim();
    let source = source.strip_suffix(';').unwrap_or(source).trim_end();

    let Some(head) = ARROW_HEAD.find(source) else {
        return FunctionShape::InvalidFormat;
    };
    let block = &source[head.end() - 1..];
    if find_matching(block) != Some(block.len() - 1) {
        return FunctionShape::InvalidFormat;
    }
    let body = &block[1..block.len() - 1];

    let Some((return_at, fields)) = find_return_object(body) else {
        return FunctionShape::MissingReturn;
    };

    let mut object = ReturnObject {
        bindings: collect_bindings(&body[..return_at]),
        ..ReturnObject::default()
    };

    for entry in split_top_level(fields, ",") {
        let Some(colon) = find_top_level(entry, ':') else {
            continue;
        };
        let value = entry[colon + 1..].trim().to_string();
        match strip_quotes(entry[..colon].trim()) {
            "text" => object.text = Some(value),
            "html" => object.html = Some(value),
            _ => {}
        }
    }

    FunctionShape::Recognized(object)
}

/// Start of the first `return {` in code and the text between its braces
fn find_return_object(body: &str) -> Option<(usize, &str)> {
    let code = code_offsets(body);
    RETURN_OBJECT
        .find_iter(body)
        .filter(|m| code.binary_search(&m.start()).is_ok())
        .find_map(|m| {
            let open = m.end() - 1;
            let close = open + find_matching(&body[open..])?;
            Some((m.start(), &body[open + 1..close]))
        })
}

fn collect_bindings(body: &str) -> Bindings {
    let mut bindings = Bindings::new();
    let code = code_offsets(body);

    for captures in STRING_BINDING.captures_iter(body) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if code.binary_search(&whole.start()).is_err() {
            continue;
        }
        let rest = &body[whole.end()..];
        if !rest.starts_with(['\'', '"', '`']) {
            continue;
        }
        if let Some(end) = literal_end(rest) {
            bindings.insert(name.as_str(), &rest[..=end]);
        }
    }

    bindings
}

/// Runs user source against a page
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    evaluator: Evaluator,
}

impl Extractor {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            evaluator: Evaluator::new(policy),
        }
    }

    /// Produce a result from user source
    ///
    /// Fields missing from the return object are omitted; an object with
    /// neither `text` nor `html` yields an empty result.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the source is not `(page) => { ... }`
    /// - `MissingReturn` if the body has no `return { ... }`
    /// - `UnsupportedExpression` from the evaluator under the reject policy
    pub fn extract(&self, code: &str, page: &PageContext) -> Result<FunctionResult> {
        let object = match recognize(code) {
            FunctionShape::InvalidFormat => return Err(ConcopyError::InvalidFormat),
            FunctionShape::MissingReturn => return Err(ConcopyError::MissingReturn),
            FunctionShape::Recognized(object) => object,
        };

        let field = |expr: Option<&String>| {
            expr.map(|e| self.evaluator.evaluate_with(e, page, &object.bindings))
                .transpose()
        };

        Ok(FunctionResult {
            text: field(object.text.as_ref())?,
            html: field(object.html.as_ref())?,
        })
    }
}

/// Extract with the default (best-effort) evaluator
pub fn extract(code: &str, page: &PageContext) -> Result<FunctionResult> {
    Extractor::default().extract(code, page)
}
