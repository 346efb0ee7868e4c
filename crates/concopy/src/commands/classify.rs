//! Classify command - map source onto a builtin template

use crate::context::read_input;
use crate::output::print_json;
use anyhow::Result;
use concopy_core::classify::classify;

pub fn run(input: &str) -> Result<()> {
    let source = read_input(input)?;
    print_json(&classify(&source))
}
