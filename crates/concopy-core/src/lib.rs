// Core modules
pub mod catalog;
pub mod classify;
pub mod clipboard;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod extract;
pub mod function;
pub mod library;
pub mod page;
pub mod share;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use dispatch::{execute_copy_function, EngineOptions, Executor, FallbackPolicy};
pub use error::{ConcopyError, Result};
pub use function::{CopyFunction, CustomOptions, FunctionResult};
pub use page::PageContext;
