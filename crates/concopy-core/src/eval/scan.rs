//! Quote- and comment-aware character scanning over source text
//!
//! The scanner only tracks what is needed to find structure in user source:
//! whether a character is plain code (not inside a string, template literal
//! or comment) and how deeply it is nested in `()`, `[]`, `{}`. Template
//! literal interpolations (`${...}`) count as code.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    Quote(char),
    LineComment,
    BlockComment,
}

/// One scanned character with its lexical position
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanned {
    pub idx: usize,
    pub ch: char,
    /// Char is plain code
    pub code: bool,
    /// Char belongs to a `//` or `/* */` comment
    pub comment: bool,
    /// Char is plain code at nesting depth zero
    pub top: bool,
    /// Nesting depth once this char is consumed
    pub depth_after: usize,
    /// Lexer is in plain code once this char is consumed
    pub code_after: bool,
}

pub(crate) struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    lex: Lex,
    depth: usize,
    escaped: bool,
    /// Depths at which open `${` interpolations return to their template literal
    interpolations: Vec<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            lex: Lex::Code,
            depth: 0,
            escaped: false,
            interpolations: Vec::new(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn code_char(&mut self, ch: char) {
        match ch {
            '\'' | '"' | '`' => self.lex = Lex::Quote(ch),
            '/' if self.peek_char() == Some('/') => self.lex = Lex::LineComment,
            '/' if self.peek_char() == Some('*') => {
                self.chars.next();
                self.lex = Lex::BlockComment;
            }
            '(' | '[' | '{' => self.depth += 1,
            ')' | ']' | '}' => {
                self.depth = self.depth.saturating_sub(1);
                if ch == '}' && self.interpolations.last() == Some(&self.depth) {
                    self.interpolations.pop();
                    self.lex = Lex::Quote('`');
                }
            }
            _ => {}
        }
    }

    fn quoted_char(&mut self, ch: char, quote: char) {
        if self.escaped {
            self.escaped = false;
            return;
        }
        match ch {
            '\\' => self.escaped = true,
            c if c == quote => self.lex = Lex::Code,
            '$' if quote == '`' && self.peek_char() == Some('{') => {
                self.chars.next();
                self.interpolations.push(self.depth);
                self.depth += 1;
                self.lex = Lex::Code;
            }
            _ => {}
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let (idx, ch) = self.chars.next()?;
        let before = self.lex;
        let code = before == Lex::Code;
        let top = code && self.depth == 0;

        match self.lex {
            Lex::Code => self.code_char(ch),
            Lex::Quote(quote) => self.quoted_char(ch, quote),
            Lex::LineComment => {
                if ch == '\n' {
                    self.lex = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if ch == '*' && self.peek_char() == Some('/') {
                    self.chars.next();
                    self.lex = Lex::Code;
                }
            }
        }

        let in_comment = |lex| matches!(lex, Lex::LineComment | Lex::BlockComment);
        Some(Scanned {
            idx,
            ch,
            code,
            comment: in_comment(before) || (code && in_comment(self.lex)),
            top,
            depth_after: self.depth,
            code_after: self.lex == Lex::Code,
        })
    }
}

/// Byte index of the bracket closing the one at the start of `src`
pub(crate) fn find_matching(src: &str) -> Option<usize> {
    Scanner::new(src)
        .find(|s| {
            s.idx > 0
                && s.code
                && matches!(s.ch, ')' | ']' | '}')
                && s.depth_after == 0
                && s.code_after
        })
        .map(|s| s.idx)
}

/// Byte index of the quote closing the string or template literal at the start of `src`
pub(crate) fn literal_end(src: &str) -> Option<usize> {
    Scanner::new(src)
        .skip(1)
        .find(|s| s.code_after && s.depth_after == 0)
        .map(|s| s.idx)
}

/// Split `src` on every occurrence of `sep` that sits in top-level code
pub(crate) fn split_top_level<'a>(src: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for s in Scanner::new(src) {
        if s.top && s.idx >= start && src[s.idx..].starts_with(sep) {
            parts.push(&src[start..s.idx]);
            start = s.idx + sep.len();
        }
    }

    parts.push(&src[start..]);
    parts
}

/// First top-level occurrence of `ch`
pub(crate) fn find_top_level(src: &str, ch: char) -> Option<usize> {
    Scanner::new(src).find(|s| s.top && s.ch == ch).map(|s| s.idx)
}

/// Byte offsets of plain-code chars, ascending
pub(crate) fn code_offsets(src: &str) -> Vec<usize> {
    Scanner::new(src).filter(|s| s.code).map(|s| s.idx).collect()
}

/// Replace comments with spaces, keeping line breaks
pub(crate) fn strip_comments(src: &str) -> String {
    Scanner::new(src)
        .map(|s| match (s.comment, s.ch) {
            (true, '\n') | (false, _) => s.ch,
            (true, _) => ' ',
        })
        .collect()
}

/// Resolve backslash escapes in a literal body
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_quotes_and_parens() {
        let parts = split_top_level(r#"a + "b + c" + f(x + y)"#, "+");
        assert_eq!(parts, vec!["a ", r#" "b + c" "#, " f(x + y)"]);
    }

    #[test]
    fn test_split_double_bar() {
        let parts = split_top_level("a || 'x||y' || b", "||");
        assert_eq!(parts, vec!["a ", " 'x||y' ", " b"]);
    }

    #[test]
    fn test_split_ignores_template_interpolation() {
        let parts = split_top_level("`${a + b}` + c", "+");
        assert_eq!(parts, vec!["`${a + b}` ", " c"]);
    }

    #[test]
    fn test_find_matching_skips_braces_in_strings() {
        let src = r#"{ a: '}', b: { c: "{" } } tail"#;
        let close = find_matching(src).unwrap();
        assert_eq!(&src[close + 1..], " tail");
    }

    #[test]
    fn test_find_matching_skips_comments() {
        let src = "{ // don't }\n x /* } */ } rest";
        let close = find_matching(src).unwrap();
        assert_eq!(&src[close + 1..], " rest");
    }

    #[test]
    fn test_find_matching_unbalanced() {
        assert_eq!(find_matching("{ a: 1"), None);
    }

    #[test]
    fn test_literal_end() {
        assert_eq!(literal_end(r#"'it\'s' + x"#), Some(6));
        assert_eq!(literal_end("`a${ '`' }b` c"), Some(11));
        assert_eq!(literal_end("'open"), None);
    }

    #[test]
    fn test_find_top_level_colon() {
        assert_eq!(find_top_level(r#""a:b": c"#, ':'), Some(5));
    }

    #[test]
    fn test_code_offsets() {
        let src = "'r' x // y\nz";
        assert_eq!(code_offsets(src), vec![0, 3, 4, 5, 6, 11]);
    }

    #[test]
    fn test_strip_comments() {
        let src = "a // it's\nb /* c } */ 'd // e' `f /* g */`";
        assert_eq!(
            strip_comments(src),
            "a        \nb         'd // e' `f /* g */`"
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\nb\t\"c\"\\"#), "a\nb\t\"c\"\\");
        assert_eq!(unescape(r"\$\`"), "$`");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}
