use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_VAR: &str = "GROUPSAVE_LOG";
const DEFAULT_FILTER: &str = "groupsave=info";

/// Send tracing output to `groupsave.log` in `data_dir`. The terminal
/// belongs to the TUI, so nothing is written to stdout or stderr.
///
/// Filter comes from `GROUPSAVE_LOG`, then `RUST_LOG`, then `groupsave=info`.
pub(crate) fn init(data_dir: &Path) -> Result<()> {
    let log_path = data_dir.join("groupsave.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = %log_path.display(), "groupsave started");
    Ok(())
}
