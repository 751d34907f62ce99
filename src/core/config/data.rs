use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings persisted in `config.toml`. Every field is optional so that an
/// unset key falls back to the built-in default.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL (e.g., "http://10.0.0.5:8000")
    pub base_url: Option<String>,
    /// Model selected at startup until the model list says otherwise
    pub default_model: Option<String>,
    /// Number of recent messages sent along as chat context
    pub history_limit: Option<usize>,
    /// Enable markdown rendering in the chat area
    pub markdown: Option<bool>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/lanchat/config.toml` → `~/.config/lanchat/config.toml`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
