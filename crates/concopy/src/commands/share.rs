//! Share command - print an install URL for a stored function

use crate::context::Context;
use crate::output::print_text;
use anyhow::Result;
use concopy_core::ConcopyError;
use concopy_core::share::encode_share_url;
use std::path::Path;

pub fn run(config: &Path, id: &str, base: &str) -> Result<()> {
    let ctx = Context::new(config)?;
    let func = ctx
        .store
        .get(id)
        .ok_or_else(|| ConcopyError::FunctionNotFound(id.to_string()))?;

    print_text(&encode_share_url(base, func)?)?;
    Ok(())
}
