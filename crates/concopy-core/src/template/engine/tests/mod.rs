//! Tests for template engine
//!
//! Organized into focused submodules.

use super::*;

// Test helper functions
mod helpers;

// TokenStream tests
mod tokenstream;

mod render_basic;
