//! `concopy.toml` configuration

mod model;

pub use model::{Config, OutputFormat, SettingsConfig, StoreConfig, Theme};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "concopy.toml";

/// Default function store file name, relative to the config file
pub const DEFAULT_STORE_FILE: &str = "functions.json";
