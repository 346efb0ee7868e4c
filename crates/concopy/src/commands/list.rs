//! List command - show stored functions

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use concopy_core::CopyFunction;
use concopy_core::library::{DEFAULT_DATE_FORMAT, DEFAULT_TRUNCATE_SUFFIX, format_date, truncate};
use std::path::Path;

pub fn run(config: &Path, json: bool) -> Result<()> {
    let ctx = Context::new(config)?;
    let functions = ctx.store.functions();

    if json {
        return print_json(functions);
    }

    if functions.is_empty() {
        print_text(&format!(
            "No functions in {}",
            ctx.store.path().display()
        ))?;
        return Ok(());
    }

    for func in functions {
        print_text(&format!(
            "{}  {}  {}  {}",
            func.id.cyan(),
            func.name.bold(),
            kind(func).dimmed(),
            format_date(func.updated_at, DEFAULT_DATE_FORMAT).unwrap_or_default()
        ))?;
        if !func.description.is_empty() {
            print_text(&format!("    {}", truncate(&func.description, 72, DEFAULT_TRUNCATE_SUFFIX)))?;
        }
    }
    Ok(())
}

fn kind(func: &CopyFunction) -> String {
    match (func.executable_code(), func.template_id()) {
        (Some(_), _) => "code".to_string(),
        (None, Some(template_id)) => format!("template:{}", template_id),
        (None, None) => "empty".to_string(),
    }
}
