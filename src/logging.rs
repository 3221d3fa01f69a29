//! File logging. The terminal belongs to the TUI, so logs go to
//! `<cache_dir>/muxtree/muxtree.log`.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "muxtree.log";

/// Filter directives are read from this variable, `info` when unset
pub const LOG_ENV: &str = "MUXTREE_LOG";

/// Install the global subscriber and return the log file path.
pub fn init_logging() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .context("Could not find cache directory")?
        .join("muxtree");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let log_path = dir.join(LOG_FILE);
    File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let writer = BoxMakeWriter::new({
        let log_path = log_path.clone();
        move || -> Box<dyn io::Write + Send> {
            match File::options().create(true).append(true).open(&log_path) {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        }
    });

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(log_path)
}
