//! CLI command implementations

pub mod classify;
pub mod eval;
pub mod install;
pub mod list;
pub mod run;
pub mod share;
pub mod templates;
