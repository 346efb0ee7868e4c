//! Global context for CLI commands

use anyhow::{Context as _, Result, bail};
use concopy_core::PageContext;
use concopy_core::config::Config;
use concopy_core::page::html::from_html;
use concopy_core::store::FunctionStore;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::PageArgs;

/// Loaded config and function store
pub struct Context {
    pub config_path: PathBuf,
    pub config: Config,
    pub store: FunctionStore,
}

impl Context {
    /// Load the config (defaults if absent) and the store it points at
    ///
    /// # Errors
    ///
    /// Returns an error if the config or store file exists but cannot be parsed
    pub fn new(config_path: &Path) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        let store_path = config.store_path(config_path);
        tracing::debug!(store = %store_path.display(), "loading function store");
        let store = FunctionStore::load(&store_path)?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            config,
            store,
        })
    }
}

/// Read a source argument: a file path, or `-` for stdin
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
}

/// Build the page context described by the page flags
pub fn load_page(args: &PageArgs) -> Result<PageContext> {
    let selection = args.selection.clone().unwrap_or_default();

    if let Some(path) = &args.page {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut page: PageContext = serde_json::from_str(&content)
            .with_context(|| format!("Invalid page context in {}", path.display()))?;
        if args.selection.is_some() {
            page.selection = selection;
        }
        return Ok(page);
    }

    let Some(url) = &args.url else {
        bail!("No page context: pass --page <FILE>, --html <FILE> --url <URL>, or --url <URL>");
    };

    if let Some(path) = &args.html {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(from_html(&html, url, &selection)?);
    }

    Ok(PageContext::new(args.title.clone().unwrap_or_default(), url.clone()).with_selection(selection))
}
