//! Diagnostic logging to a file.
//!
//! The full-screen UI owns the terminal, so `tracing` output goes to a log
//! file: `--log <file>` when given, otherwise `lanchat.log` in the data
//! directory. Verbosity comes from `LANCHAT_LOG` (default `warn`).

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

pub const LOG_ENV_VAR: &str = "LANCHAT_LOG";
const LOG_FILE_NAME: &str = "lanchat.log";

pub fn resolve_log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::get_data_dir()
            .ok()
            .map(|dir| dir.join(LOG_FILE_NAME)),
    }
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. Returns the log path in use, or `None`
/// when no writable location exists and logging stays off.
pub fn init(explicit: Option<&Path>) -> Option<PathBuf> {
    let path = resolve_log_path(explicit)?;
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
