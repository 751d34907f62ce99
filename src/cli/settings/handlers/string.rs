//! String setting handlers for text-based settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::core::config::defaults::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::utils::url::normalize_base_url;

/// Data-driven handler for free-text settings.
pub struct StringHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    get: fn(&Config) -> Option<&String>,
    set_field: fn(&mut Config, Option<String>),
    validate: fn(&str) -> Result<String, SettingError>,
}

impl SettingHandler for StringHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = (self.validate)(input.trim())?;
        let message = success_set(self.key, &value);
        (self.set_field)(config, Some(value));
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        success_unset(self.key, self.default_display)
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, value),
            None => format!("  {}: (unset, default: {})", self.key, self.default_display),
        }
    }
}

fn validate_base_url(input: &str) -> Result<String, SettingError> {
    if input.starts_with("http://") || input.starts_with("https://") {
        Ok(normalize_base_url(input))
    } else {
        Err(SettingError::InvalidUrl(input.to_string()))
    }
}

fn accept_any(input: &str) -> Result<String, SettingError> {
    Ok(input.to_string())
}

/// Create a handler for the `base-url` setting.
pub fn base_url_handler() -> StringHandler {
    StringHandler {
        key: "base-url",
        hint: "To set the backend address, give its base URL:",
        example: "lanchat set base-url http://192.168.1.20:8000",
        default_display: DEFAULT_BASE_URL,
        get: |c| c.base_url.as_ref(),
        set_field: |c, v| c.base_url = v,
        validate: validate_base_url,
    }
}

/// Create a handler for the `default-model` setting.
pub fn default_model_handler() -> StringHandler {
    StringHandler {
        key: "default-model",
        hint: "To set the model selected at startup, give its id:",
        example: "lanchat set default-model gpt-4.1-mini",
        default_display: DEFAULT_MODEL,
        get: |c| c.default_model.as_ref(),
        set_field: |c, v| c.default_model = v,
        validate: accept_any,
    }
}
