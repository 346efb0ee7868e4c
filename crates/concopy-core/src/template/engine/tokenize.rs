//! Tokenization for template engine
//!
//! Provides O(n) tokenization using a state machine.

/// Token classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// {{key}} - value is HTML-escaped
    Escaped { key: String },

    /// {{&key}} - value is inserted raw
    Raw { key: String },
}

impl TokenKind {
    pub fn key(&self) -> &str {
        match self {
            TokenKind::Escaped { key } | TokenKind::Raw { key } => key,
        }
    }
}

/// A single well-formed {{...}} token with position and classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Absolute byte position of `{{` in template
    pub start: usize,
    /// Total length in bytes including {{ and }}
    pub length: usize,
}

/// Tokenization state machine (explicit for testability)
///
/// # State Transitions
///
/// ```text
/// Normal ──{───> SeenLBrace ──{───> InToken ──}───> SeenRBrace ──}───> [Yield Token] → Normal
///   │               │                  │                  │
///   │ (not {)       │ (not {)          │ (bad byte)       │ (not })
///   └──────────────>└─────────────────>└──> Normal        └──────────> InToken
///
/// InToken ──{ (empty content)──> InToken shifted one byte right   ({{{key}} → {{key}})
/// Malformed {{ without }} → never yielded, copied verbatim by the renderer
/// ```
///
/// Bytes that cannot appear in a placeholder abort the token and are
/// reprocessed in `Normal`, so `{{ {{title}}` still yields `{{title}}`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    /// Normal text scanning
    Normal,

    /// Seen first `{`, checking for second `{`
    SeenLBrace {
        /// Position of the first `{` character
        pos: usize,
    },

    /// Inside `{{...}}`, scanning until `}}`
    InToken {
        /// Byte position of the opening `{{`
        start: usize,
        /// Byte position where token content starts (after `{{`)
        content_start: usize,
    },

    /// Seen first `}` inside token, checking for second `}`
    SeenRBrace {
        /// Byte position of the opening `{{`
        start: usize,
        /// Byte position where token content starts (after `{{`)
        content_start: usize,
        /// Position of the first `}` character
        rbrace_pos: usize,
    },
}

/// Bytes allowed between `{{` and `}}`
fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'&' | b' ' | b'\t')
}

/// Placeholder keys: identifier segments joined by dots
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        })
}

/// Iterator over well-formed tokens in a template string
///
/// # Performance
///
/// - **O(n) guarantee**: Each byte is visited at most three times (abort reprocessing)
/// - **No allocations in hot path**: Works with byte slices
/// - **Forward-only**: Position never moves backward
pub(crate) struct TokenStream<'a> {
    /// Zero-copy byte slice of template text
    bytes: &'a [u8],
    /// Current byte position
    pos: usize,
    /// State machine state
    state: ScanState,
    /// Step count for O(n) runaway protection
    step_count: usize,
}

impl<'a> TokenStream<'a> {
    /// Create a new TokenStream from template text
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal,
            step_count: 0,
        }
    }

    /// Classify token content into TokenKind
    ///
    /// - `&key` → Raw
    /// - `key` or `nested.key` → Escaped
    /// - anything else → not a token
    fn classify_content(content: &str) -> Option<TokenKind> {
        let trimmed = content.trim();

        if let Some(rest) = trimmed.strip_prefix('&') {
            let key = rest.trim();
            is_valid_key(key).then(|| TokenKind::Raw {
                key: key.to_string(),
            })
        } else {
            is_valid_key(trimmed).then(|| TokenKind::Escaped {
                key: trimmed.to_string(),
            })
        }
    }

    /// Check if we should continue iteration (guards for runaway and EOF)
    #[inline]
    fn should_continue(&mut self, max_steps: usize) -> bool {
        self.step_count += 1;
        self.step_count <= max_steps && self.pos < self.bytes.len()
    }

    /// Record step for O(n) performance verification in tests
    #[cfg(test)]
    #[inline]
    fn record_test_step() {
        test_counter::inc();
    }

    /// Process Normal state: scan for opening braces
    fn process_normal_state(&mut self, byte: u8) {
        if byte == b'{' {
            self.state = ScanState::SeenLBrace { pos: self.pos };
        }
        self.pos += 1;
    }

    /// Process SeenLBrace state: check for second brace to start token
    ///
    /// A non-brace byte is left in place and reprocessed in Normal state.
    fn process_seen_lbrace(&mut self, byte: u8, lbrace_pos: usize) {
        if byte == b'{' {
            self.state = ScanState::InToken {
                start: lbrace_pos,
                content_start: self.pos + 1,
            };
            self.pos += 1;
        } else {
            self.state = ScanState::Normal;
        }
    }

    /// Process InToken state: scan for closing braces
    ///
    /// A byte that cannot appear in a placeholder aborts the token and is
    /// reprocessed in Normal state.
    fn process_in_token(&mut self, byte: u8, start: usize, content_start: usize) {
        if byte == b'}' {
            self.state = ScanState::SeenRBrace {
                start,
                content_start,
                rbrace_pos: self.pos,
            };
            self.pos += 1;
        } else if byte == b'{' && self.pos == content_start {
            // {{{ - the real opening pair starts one byte later
            self.state = ScanState::InToken {
                start: start + 1,
                content_start: content_start + 1,
            };
            self.pos += 1;
        } else if is_token_byte(byte) {
            self.pos += 1;
        } else {
            self.state = ScanState::Normal;
        }
    }

    /// Process SeenRBrace state: check for second brace to complete token
    ///
    /// Returns the completed token, if its content is a valid placeholder
    fn process_seen_rbrace(
        &mut self,
        byte: u8,
        start: usize,
        content_start: usize,
        rbrace_pos: usize,
    ) -> Option<Token> {
        if byte == b'}' {
            let content = std::str::from_utf8(&self.bytes[content_start..rbrace_pos]).unwrap_or("");
            let token = Self::classify_content(content).map(|kind| Token {
                kind,
                start,
                length: self.pos + 1 - start,
            });

            self.state = ScanState::Normal;
            self.pos += 1;

            token
        } else {
            // Single } inside content - InToken decides what to do with this byte
            self.state = ScanState::InToken {
                start,
                content_start,
            };
            None
        }
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        const MAX_STEPS_MULTIPLIER: usize = 4;
        let max_steps = self.bytes.len().saturating_mul(MAX_STEPS_MULTIPLIER);

        loop {
            if !self.should_continue(max_steps) {
                return None;
            }

            let byte = self.bytes[self.pos];
            #[cfg(test)]
            Self::record_test_step();

            match self.state.clone() {
                ScanState::Normal => self.process_normal_state(byte),
                ScanState::SeenLBrace { pos } => self.process_seen_lbrace(byte, pos),
                ScanState::InToken {
                    start,
                    content_start,
                } => self.process_in_token(byte, start, content_start),
                ScanState::SeenRBrace {
                    start,
                    content_start,
                    rbrace_pos,
                } => {
                    let token = self.process_seen_rbrace(byte, start, content_start, rbrace_pos);
                    if token.is_some() {
                        return token;
                    }
                }
            }
        }
    }
}

/// Test-only step counter for O(n) performance verification
///
/// Uses thread-local storage to avoid interference between parallel tests.
#[cfg(test)]
pub(crate) mod test_counter {
    use std::cell::Cell;

    thread_local! {
        static TEST_STEP_COUNTER: Cell<usize> = const { Cell::new(0) };
    }

    pub(crate) fn reset() {
        TEST_STEP_COUNTER.with(|c| c.set(0));
    }

    pub(crate) fn get() -> usize {
        TEST_STEP_COUNTER.with(|c| c.get())
    }

    pub(crate) fn inc() {
        TEST_STEP_COUNTER.with(|c| c.set(c.get() + 1));
    }
}
