use std::fs::File;
use std::io::LineWriter;
use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};

/// Where log records are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Plain-text file, truncated on open. Records are line-buffered so each
    /// one reaches disk as it is written.
    File(PathBuf),
    /// Standard error, for interactive debugging.
    Stderr,
}

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "smilex=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub target: LogTarget,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            target: LogTarget::File(PathBuf::from("debug.log")),
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Intended usage is first thing in `main`;
/// the bootstrap sequence assumes its diagnostics have somewhere to go.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let mut result = Ok(());

    INIT.call_once(|| {
        result = build_logger(config);
    });

    result
}

fn build_logger(config: LoggingConfig) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        // Debug by default: the log file is the only record of the chosen
        // framebuffer attributes and the extension list.
        builder.filter_level(log::LevelFilter::Debug);
    }

    match config.target {
        LogTarget::File(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(LineWriter::new(file))));
            builder.write_style(env_logger::WriteStyle::Never);
        }
        LogTarget::Stderr => {
            builder.target(env_logger::Target::Stderr);
            builder.write_style(env_logger::WriteStyle::Auto);
        }
    }

    builder.init();

    log::debug!("logging initialized");
    Ok(())
}
