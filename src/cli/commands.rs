use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::cli::Cli;
use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use crate::feed::fetcher::FeedFetcher;
use crate::storage::{render_dump, RecordStore};
use crate::watch::{SourceOutcome, Watcher};

/// Run one update cycle and print the resulting store.
pub async fn run(config: &Config) -> Result<()> {
    info!(
        "Watching {} feed(s) for {} platform(s), store at {}",
        config.feeds.len(),
        config.platforms.len(),
        config.store_path.display()
    );

    let fetcher = FeedFetcher::new(&config.settings)?;
    let watcher = Watcher::new(config, fetcher)?;
    let report = watcher.run().await?;

    for source in &report.sources {
        debug!("{} -> {:?}", source.url, source.outcome);
        if let SourceOutcome::Persisted { added } = source.outcome {
            info!("{}: recorded {} new entries", source.url, added);
        }
    }

    println!("DONE");
    println!("{}", "-".repeat(75));
    print!("{}", watcher.dump()?);

    Ok(())
}

/// Print the stored entries without touching the network.
pub fn show(config: &Config) -> Result<()> {
    let store = RecordStore::new(config.store_path.clone());
    print!("{}", render_dump(&store.load()?));
    Ok(())
}

pub fn check(config: &Config, title: &str) -> Result<()> {
    let store = RecordStore::new(config.store_path.clone());
    if store.contains(title)? {
        println!("✅ '{}' is already recorded", title);
    } else {
        println!("🆕 '{}' has not been seen yet", title);
    }
    Ok(())
}

/// Write the default configuration. An existing file is never overwritten.
pub fn init(config_path: Option<PathBuf>) -> Result<()> {
    let config_file = get_config_file(config_path)?;
    write_default_config(&config_file)?;

    println!("✅ release-watch initialized successfully!");
    println!("   Config file: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("   1. Edit feeds and platforms in the config file");
    println!("   2. Run: release-watch run");

    Ok(())
}

fn write_default_config(config_file: &Path) -> Result<()> {
    if config_file.exists() {
        return Err(Error::AlreadyExists(format!(
            "Configuration file already exists: {}",
            config_file.display()
        )));
    }

    if let Some(parent) = config_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            info!("Created configuration directory: {}", parent.display());
        }
    }

    Config::default().save(config_file)?;
    info!("Created default configuration: {}", config_file.display());
    Ok(())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Install the global subscriber at the level picked by [`effective_level`].
/// When file logging is on, the returned guard must be held until exit so
/// buffered lines get flushed.
pub fn init_logging(debug: bool, verbose: bool, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = effective_level(debug, verbose, &logging.level);

    // Validate once; each layer needs its own filter instance
    EnvFilter::try_new(&level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))?;

    let (plain_layer, json_layer) = if logging.json_format {
        let layer = fmt::layer()
            .json()
            .with_file(debug)
            .with_line_number(debug)
            .with_filter(EnvFilter::new(&level));
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_target(false)
            .with_file(debug)
            .with_line_number(debug)
            .with_filter(EnvFilter::new(&level));
        (Some(layer), None)
    };

    let (file_layer, guard) = if logging.log_to_file {
        let path = Path::new(&logging.log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "release-watch.log".into());

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(EnvFilter::new(&level));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized");
    Ok(guard)
}

/// `--debug` forces `debug`. `--verbose` lifts a configured `warn`, `error`
/// or `off` to `info` and leaves louder or per-target directives alone.
pub fn effective_level(debug: bool, verbose: bool, configured: &str) -> String {
    if debug {
        return "debug".to_string();
    }

    let quiet = matches!(
        configured.trim().to_ascii_lowercase().as_str(),
        "warn" | "error" | "off"
    );
    if verbose && quiet {
        "info".to_string()
    } else {
        configured.to_string()
    }
}

fn get_config_file(config_path: Option<PathBuf>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path),
        None => Config::default_path(),
    }
}
