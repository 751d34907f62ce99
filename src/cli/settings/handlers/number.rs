//! Numeric setting handlers.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::core::constants::DEFAULT_HISTORY_LIMIT;

/// Handler for the `history-limit` setting.
pub struct HistoryLimitHandler;

pub fn history_limit_handler() -> HistoryLimitHandler {
    HistoryLimitHandler
}

impl SettingHandler for HistoryLimitHandler {
    fn key(&self) -> &'static str {
        "history-limit"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set how many recent messages go along with a prompt, give a number:",
                example: "lanchat set history-limit 20",
            });
        };

        let limit = input
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| SettingError::InvalidNumber(input.clone()))?;
        config.history_limit = Some(limit);
        Ok(success_set(self.key(), &limit.to_string()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.history_limit = None;
        success_unset(self.key(), &DEFAULT_HISTORY_LIMIT.to_string())
    }

    fn format(&self, config: &Config) -> String {
        match config.history_limit {
            Some(limit) => format!("  history-limit: {limit}"),
            None => format!("  history-limit: (unset, default: {DEFAULT_HISTORY_LIMIT})"),
        }
    }
}
