use crate::core::config::data::Config;
use crate::core::constants::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn default_model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Context window in messages; a stored zero is treated as unset.
    pub fn history_limit(&self) -> usize {
        self.history_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }
}
