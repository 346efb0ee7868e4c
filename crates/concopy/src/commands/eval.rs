//! Eval command - execute function source without storing it

use crate::cli::{OutputArgs, PageArgs};
use crate::commands::run::execute;
use crate::context::{Context, read_input};
use anyhow::Result;
use concopy_core::CopyFunction;
use std::path::Path;

pub fn run(config: &Path, input: &str, page: &PageArgs, output: &OutputArgs) -> Result<()> {
    let ctx = Context::new(config)?;
    let source = read_input(input)?;
    let func = CopyFunction::from_code("eval", input, source);

    execute(&ctx, &func, page, output)
}
