//! Install command - add a function from a share URL

use crate::context::Context;
use crate::output::print_text;
use anyhow::Result;
use colored::Colorize;
use concopy_core::share::decode_share_url;
use std::path::Path;

pub fn run(config: &Path, url: &str) -> Result<()> {
    let mut ctx = Context::new(config)?;
    let func = decode_share_url(url)?.into_function();
    let (id, name) = (func.id.clone(), func.name.clone());

    ctx.store.add(func);
    ctx.store.save()?;
    tracing::debug!(config = %ctx.config_path.display(), %id, "function installed");

    print_text(&format!("{} Installed \"{}\" as {}", "✓".green().bold(), name, id))?;
    Ok(())
}
