//! CLI command definitions

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    Text,
    /// JSON summary
    Json,
}

/// CLI arguments for invoice-harvest
#[derive(Parser, Debug)]
#[command(name = "invoice-harvest")]
#[command(author, version, about = "Archive Amazon order invoices as HTML files")]
#[command(long_about = r#"
invoice-harvest signs in to an Amazon store through a WebDriver endpoint,
walks the order history and writes every invoice that is not archived yet.

A run has three steps:
1. Login: reuse the browser profile's session, or sign in (with optional one-time code)
2. Discovery: walk each order group and page, collecting invoice links
3. Retrieval: open each invoice and write it atomically to the output directory

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./harvest.toml      Project-level config (or ./.harvest.toml)
3. ~/.config/invoice-harvest/config.toml   Global config
Environment variables (HARVEST_CREDENTIALS__PASSWORD, ...) override files.

Example:
  invoice-harvest --domain .de --output-dir ~/invoices --dir-per-year
  invoice-harvest --order-group 2023 --order-group 2024 --no-digital
  invoice-harvest --show-config
"#)]
pub struct Cli {
    /// Store to crawl: .com, .co.uk or .de
    #[arg(short, long, value_name = "KEY")]
    pub domain: Option<String>,

    /// Directory the invoices are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write each invoice into a sub-directory named after its order year
    #[arg(long)]
    pub dir_per_year: bool,

    /// Only walk these order groups (can be specified multiple times)
    #[arg(short = 'g', long, value_name = "NAME")]
    pub order_group: Vec<String>,

    /// Skip regular orders
    #[arg(long)]
    pub no_regular: bool,

    /// Walk digital orders
    #[arg(long, conflicts_with = "no_digital")]
    pub digital: bool,

    /// Skip digital orders
    #[arg(long)]
    pub no_digital: bool,

    /// WebDriver endpoint
    #[arg(long, value_name = "URL")]
    pub webdriver: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Digital orders override: `Some(true)` for `--digital`,
    /// `Some(false)` for `--no-digital`, `None` to keep the configuration
    pub fn digital_override(&self) -> Option<bool> {
        match (self.digital, self.no_digital) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Default tracing filter for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
