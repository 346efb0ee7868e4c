use anyhow::Result;
use colored::Colorize;
use concopy_core::FunctionResult;
use concopy_core::clipboard::{ClipboardWriter, StreamClipboard};
use concopy_core::config::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Print a function result the way a clipboard would receive it
pub fn print_result(result: &FunctionResult, format: OutputFormat, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }
    if result.is_empty() {
        eprintln!("{} function returned neither text nor html", "⚠".yellow().bold());
        return Ok(());
    }

    let mut clipboard = StreamClipboard::new(io::stdout().lock(), format);
    clipboard.write(result)?;
    Ok(())
}
