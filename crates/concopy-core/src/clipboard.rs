//! Clipboard delivery of function results

use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::function::FunctionResult;

/// What a clipboard receives for one result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    /// Rich content with a plain-text fallback
    Html { html: String, text: String },
    Text(String),
    Empty,
}

impl ClipboardPayload {
    /// `html` wins when present; `text` (or the html itself) is the plain fallback
    pub fn from_result(result: &FunctionResult) -> Self {
        match (&result.html, &result.text) {
            (Some(html), text) => ClipboardPayload::Html {
                html: html.clone(),
                text: text.clone().unwrap_or_else(|| html.clone()),
            },
            (None, Some(text)) => ClipboardPayload::Text(text.clone()),
            (None, None) => ClipboardPayload::Empty,
        }
    }

    /// Single string for sinks that hold one representation
    pub fn preferred(&self, format: OutputFormat) -> Option<&str> {
        match (self, format) {
            (ClipboardPayload::Html { html, .. }, OutputFormat::Html) => Some(html),
            (ClipboardPayload::Html { text, .. }, OutputFormat::Text) => Some(text),
            (ClipboardPayload::Text(text), _) => Some(text),
            (ClipboardPayload::Empty, _) => None,
        }
    }
}

pub trait ClipboardWriter {
    fn write(&mut self, result: &FunctionResult) -> Result<()>;
}

/// Writes the preferred representation to a byte stream, newline-terminated
pub struct StreamClipboard<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> StreamClipboard<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClipboardWriter for StreamClipboard<W> {
    fn write(&mut self, result: &FunctionResult) -> Result<()> {
        let payload = ClipboardPayload::from_result(result);
        match payload.preferred(self.format) {
            Some(content) => writeln!(self.out, "{}", content)?,
            None => tracing::debug!("empty result, nothing written"),
        }
        self.out.flush()?;
        Ok(())
    }
}
