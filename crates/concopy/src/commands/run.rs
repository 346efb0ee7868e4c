//! Run command - execute a stored function

use crate::cli::{OutputArgs, PageArgs};
use crate::context::{Context, load_page};
use crate::output::print_result;
use anyhow::Result;
use concopy_core::{ConcopyError, CopyFunction, Executor};
use std::path::Path;

pub fn run(config: &Path, id: &str, page: &PageArgs, output: &OutputArgs) -> Result<()> {
    let ctx = Context::new(config)?;
    let func = ctx
        .store
        .get(id)
        .ok_or_else(|| ConcopyError::FunctionNotFound(id.to_string()))?;

    execute(&ctx, func, page, output)
}

/// Execute `func` with the configured engine and print the result
pub fn execute(ctx: &Context, func: &CopyFunction, page: &PageArgs, output: &OutputArgs) -> Result<()> {
    let page = load_page(page)?;
    let result = Executor::new(ctx.config.engine).execute(func, &page)?;

    let format = output
        .format
        .map(Into::into)
        .unwrap_or(ctx.config.settings.default_format);
    print_result(&result, format, output.json)
}
