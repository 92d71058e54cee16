//! CLI entrypoint for invoice-harvest
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use harvest_application::{
    ArchiveInput, ArchiveProgress, ArchiveRecordsUseCase, BrowserPort, NoProgress, RecordStore,
};
use harvest_infrastructure::{ConfigError, ConfigLoader, FileConfig, FileRecordStore, WebDriverBrowser};
use harvest_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so the log file is flushed on exit
    let _log_guard = init_logging(&cli)?;

    info!("Starting invoice-harvest");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&cli, &mut config);

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", config.to_display_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let (errors, warnings): (Vec<_>, Vec<_>) =
        config.validate().into_iter().partition(|issue| issue.is_error());
    if !warnings.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&warnings));
    }
    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors).into());
    }

    let profile = config.vendor.profile()?;
    let discovery = config.vendor.discovery_options(&profile);
    let (policy, _) = config.timeouts.to_wait_policy();
    let Some(credentials) = config.credentials.credentials() else {
        bail!("credentials are incomplete");
    };
    let Some(layout) = config.output.layout() else {
        bail!("no output directory configured");
    };

    // === Dependency Injection ===
    let browser = Arc::new(
        WebDriverBrowser::connect(&config.browser.webdriver_url, &config.browser.options())
            .await
            .with_context(|| {
                format!("could not open a browser session at {}", config.browser.webdriver_url)
            })?,
    );
    let store = Arc::new(FileRecordStore::new(layout));

    let use_case = ArchiveRecordsUseCase::new(
        browser.clone() as Arc<dyn BrowserPort>,
        store as Arc<dyn RecordStore>,
    )
    .with_policy(policy);
    let input = ArchiveInput::new(profile, credentials).with_discovery(discovery);

    let progress: Box<dyn ArchiveProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else if cli.output == OutputFormat::Text {
        Box::new(SimpleProgress)
    } else {
        Box::new(NoProgress)
    };

    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await;

    // The session is closed whatever the outcome
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser session: {}", e);
    }

    match result {
        Ok(summary) => {
            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format(&summary),
                OutputFormat::Json => ConsoleFormatter::format_json(&summary),
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Install the tracing subscriber: stderr always, plus `--log-file` when given.
///
/// `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command line flags take precedence over every configuration source
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(domain) = &cli.domain {
        config.vendor.domain = domain.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = Some(dir.clone());
    }
    if cli.dir_per_year {
        config.output.dir_per_year = true;
    }
    if !cli.order_group.is_empty() {
        config.vendor.order_groups = Some(cli.order_group.clone());
    }
    if cli.no_regular {
        config.vendor.regular = false;
    }
    if let Some(digital) = cli.digital_override() {
        config.vendor.digital = Some(digital);
    }
    if let Some(url) = &cli.webdriver {
        config.browser.webdriver_url = url.clone();
    }
}
