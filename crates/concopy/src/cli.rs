//! CLI command structure using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use concopy_core::config::{CONFIG_FILE, OutputFormat};
use std::path::PathBuf;

/// Base used by `share` when none is given
pub const DEFAULT_SHARE_BASE: &str = "concopy://options";

#[derive(Parser)]
#[command(name = "concopy")]
#[command(version, about = "Copy web page content through custom functions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file; the function store path resolves relative to it
    #[arg(long, global = true, env = "CONCOPY_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List builtin templates
    Templates {
        #[arg(long)]
        json: bool,

        /// Also print each template's source
        #[arg(long)]
        code: bool,
    },

    /// Map function source onto the closest builtin template
    Classify {
        /// Source file, or `-` for stdin
        input: String,
    },

    /// Run a stored function against a page
    Run {
        /// Function id
        id: String,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run function source against a page without storing it
    Eval {
        /// Source file, or `-` for stdin
        input: String,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List stored functions
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print a share URL for a stored function
    Share {
        /// Function id
        id: String,

        /// URL the install fragment is appended to
        #[arg(long, default_value = DEFAULT_SHARE_BASE)]
        base: String,
    },

    /// Install a function from a share URL
    Install {
        url: String,
    },
}

/// Where the page context comes from
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page context as JSON
    #[arg(long, conflicts_with_all = ["html", "title"])]
    pub page: Option<PathBuf>,

    /// HTML document to read the page context from (needs --url)
    #[arg(long, requires = "url")]
    pub html: Option<PathBuf>,

    /// Page URL
    #[arg(long)]
    pub url: Option<String>,

    /// Page title, when no document is given
    #[arg(long, requires = "url")]
    pub title: Option<String>,

    /// Selected text
    #[arg(long)]
    pub selection: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Representation to print; defaults to settings.default_format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}
