//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the data-driven handlers
//! cover the three shapes of value the config file holds:
//!
//! - String settings (`base-url`, `default-model`)
//! - Boolean settings (`markdown`)
//! - Number settings (`history-limit`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
///
/// Handlers only edit the in-memory [`Config`]; loading and saving the file
/// is left to [`helpers::mutate_config_at`].
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the words after the key, returning a success message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the built-in default applies again.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the current value for display in `lanchat set` output.
    fn format(&self, config: &Config) -> String;
}
