//! Restricted expression evaluator
//!
//! Resolves the handful of expression forms a copy function may use against
//! a page context. The grammar is closed and has no loops, calls other than
//! `render`, or variables other than string constants:
//!
//! ```text
//! expr     := concat ('||' concat)*          first non-empty wins
//! concat   := operand ('+' operand)*         string concatenation
//! operand  := 'text' | "text" | `text ${expr}`
//!           | page.title | page.url | page.selection
//!           | page.meta.description | page.meta?.description
//!           | render(<literal or const name>, page)
//!           | <const name> | '(' expr ')'
//! ```
//!
//! Anything else is unrecognized and handled by the [`FallbackPolicy`].

pub(crate) mod scan;

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;

use crate::error::{ConcopyError, Result};
use crate::page::PageContext;
use crate::template::render;

use scan::{find_matching, literal_end, split_top_level, unescape};

/// What to do with an expression outside the supported grammar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Keep unrecognized `+` operands as text, minus one layer of quotes
    #[default]
    BestEffort,
    /// Fail with `UnsupportedExpression`
    Reject,
}

/// String constants declared in a function body (`const name = "...";`)
///
/// Values are literal source text, resolved when referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    literals: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, literal: impl Into<String>) {
        self.literals.insert(name.into(), literal.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.literals.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Expression evaluator with a configurable fallback policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    policy: FallbackPolicy,
}

impl Evaluator {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Evaluate an expression with no constants in scope
    pub fn evaluate(&self, expression: &str, page: &PageContext) -> Result<String> {
        self.evaluate_with(expression, page, &Bindings::default())
    }

    /// Evaluate an expression with the given constants in scope
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExpression` under [`FallbackPolicy::Reject`] when
    /// the expression is outside the grammar. Never fails under
    /// [`FallbackPolicy::BestEffort`].
    pub fn evaluate_with(
        &self,
        expression: &str,
        page: &PageContext,
        bindings: &Bindings,
    ) -> Result<String> {
        let scope = Scope::new(page, bindings, self.policy);

        match (scope.resolve_expr(expression), self.policy) {
            (Some(value), _) => Ok(value),
            (None, FallbackPolicy::BestEffort) => Ok(scope.resolve_partial(expression)),
            (None, FallbackPolicy::Reject) => Err(ConcopyError::UnsupportedExpression(
                expression.trim().to_string(),
            )),
        }
    }
}

/// Evaluate an expression best-effort; never fails
pub fn evaluate(expression: &str, page: &PageContext) -> String {
    let bindings = Bindings::default();
    let scope = Scope::new(page, &bindings, FallbackPolicy::BestEffort);
    scope
        .resolve_expr(expression)
        .unwrap_or_else(|| scope.resolve_partial(expression))
}

/// Remove one layer of matching surrounding quotes
pub fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// The four field references and their values
fn field_value<'p>(page: &'p PageContext, reference: &str) -> Option<&'p str> {
    match reference {
        "page.title" => Some(&page.title),
        "page.url" => Some(&page.url),
        "page.selection" => Some(&page.selection),
        "page.meta.description" | "page.meta?.description" => {
            Some(page.description().unwrap_or(""))
        }
        _ => None,
    }
}

fn is_quoted(text: &str) -> bool {
    text.starts_with(['\'', '"', '`'])
}

/// `(…)` following a `render` call, if `operand` is one
fn render_call_args(operand: &str) -> Option<&str> {
    operand
        .strip_prefix("render")
        .map(str::trim_start)
        .filter(|call| call.starts_with('('))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Nesting limit for constants referenced from constants
const MAX_BINDING_DEPTH: usize = 8;

/// Nesting limit for groups and interpolations
const MAX_NESTING_DEPTH: usize = 64;

struct Scope<'a> {
    page: &'a PageContext,
    bindings: &'a Bindings,
    policy: FallbackPolicy,
    binding_depth: Cell<usize>,
    nesting_depth: Cell<usize>,
}

impl<'a> Scope<'a> {
    fn new(page: &'a PageContext, bindings: &'a Bindings, policy: FallbackPolicy) -> Self {
        Self {
            page,
            bindings,
            policy,
            binding_depth: Cell::new(0),
            nesting_depth: Cell::new(0),
        }
    }
}

impl Scope<'_> {
    fn resolve_expr(&self, expr: &str) -> Option<String> {
        let depth = self.nesting_depth.get();
        if depth >= MAX_NESTING_DEPTH {
            return None;
        }

        self.nesting_depth.set(depth + 1);
        let value = self.resolve_alternatives(expr);
        self.nesting_depth.set(depth);
        value
    }

    fn resolve_alternatives(&self, expr: &str) -> Option<String> {
        let mut last = String::new();

        for alternative in split_top_level(expr.trim(), "||") {
            let value = self.resolve_concat(alternative)?;
            if !value.is_empty() {
                return Some(value);
            }
            last = value;
        }

        Some(last)
    }

    fn resolve_concat(&self, expr: &str) -> Option<String> {
        split_top_level(expr, "+")
            .into_iter()
            .map(|operand| self.resolve_operand(operand.trim()))
            .collect()
    }

    /// Concatenation where unrecognized operands stay as literal text
    fn resolve_partial(&self, expr: &str) -> String {
        let expr = expr.trim();
        tracing::warn!(expression = expr, "unsupported expression, keeping unrecognized operands as text");

        split_top_level(expr, "+")
            .into_iter()
            .map(str::trim)
            .map(|operand| {
                self.resolve_operand(operand)
                    .unwrap_or_else(|| strip_quotes(operand).to_string())
            })
            .collect()
    }

    fn resolve_operand(&self, operand: &str) -> Option<String> {
        let first = operand.chars().next()?;
        let last_idx = operand.len() - operand.chars().last()?.len_utf8();

        match first {
            '`' if literal_end(operand) == Some(last_idx) && last_idx > 0 => {
                self.resolve_template_literal(&operand[1..last_idx])
            }
            '\'' | '"' if literal_end(operand) == Some(last_idx) && last_idx > 0 => {
                Some(unescape(&operand[1..last_idx]))
            }
            '(' if find_matching(operand) == Some(last_idx) => {
                self.resolve_expr(&operand[1..last_idx])
            }
            _ => {
                if let Some(value) = field_value(self.page, operand) {
                    return Some(value.to_string());
                }
                if let Some(call) = render_call_args(operand) {
                    return self.resolve_render_call(call);
                }
                if is_identifier(operand) {
                    return self.resolve_binding(operand);
                }
                None
            }
        }
    }

    /// Operands allowed as a render template: literals or bound constants
    fn resolve_literal(&self, operand: &str) -> Option<String> {
        if is_quoted(operand) {
            self.resolve_operand(operand)
        } else if is_identifier(operand) {
            self.resolve_binding(operand)
        } else {
            None
        }
    }

    /// Value of a `const` string; bound text must itself be a literal
    fn resolve_binding(&self, name: &str) -> Option<String> {
        let literal = self.bindings.get(name)?.trim();
        if !is_quoted(literal) || self.binding_depth.get() >= MAX_BINDING_DEPTH {
            return None;
        }

        self.binding_depth.set(self.binding_depth.get() + 1);
        let value = self.resolve_operand(literal);
        self.binding_depth.set(self.binding_depth.get() - 1);
        value
    }

    /// `(<template>, page)` following `render`
    fn resolve_render_call(&self, call: &str) -> Option<String> {
        if !call.starts_with('(') || find_matching(call) != Some(call.len() - 1) {
            return None;
        }

        let args: Vec<&str> = split_top_level(&call[1..call.len() - 1], ",")
            .into_iter()
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .collect();

        match args.as_slice() {
            [template, "page"] => {
                let template = self.resolve_literal(template)?;
                Some(render(&template, &self.page.to_template_context()))
            }
            _ => None,
        }
    }

    /// Body of a template literal with `${...}` interpolations
    fn resolve_template_literal(&self, body: &str) -> Option<String> {
        let mut out = String::with_capacity(body.len());
        let mut rest = body;

        while let Some(pos) = find_interpolation(rest) {
            out.push_str(&unescape(&rest[..pos]));

            let brace = pos + 1;
            let close = brace + find_matching(&rest[brace..])?;
            let inner = &rest[brace + 1..close];

            match self.resolve_expr(inner) {
                Some(value) => out.push_str(&value),
                None if self.policy == FallbackPolicy::BestEffort => {
                    tracing::warn!(interpolation = inner, "unsupported interpolation left verbatim");
                    out.push_str(&rest[pos..=close]);
                }
                None => return None,
            }

            rest = &rest[close + 1..];
        }

        out.push_str(&unescape(rest));
        Some(out)
    }
}

/// Position of the next unescaped `${` in a template literal body
fn find_interpolation(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'$' && bytes.get(i + 1) == Some(&b'{') {
            return Some(i);
        }
    }
    None
}
