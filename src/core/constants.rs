//! Shared constants used across the application

/// Space reserved for the streaming indicator + margin in the composer.
/// Rendering and cursor placement must agree on it.
pub const INDICATOR_SPACE: u16 = 4;

/// Id and title of the placeholder session used when the list cannot load.
pub const OFFLINE_SESSION_ID: &str = "1";
pub const OFFLINE_SESSION_TITLE: &str = "Demo Session (offline)";

/// Number of most recent messages sent along as chat context.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

pub const NO_SESSION_TEXT: &str = "No session selected.";
pub const LOADING_TEXT: &str = "Loading messages...";
pub const EMPTY_SESSION_TEXT: &str = "No messages yet. Start chatting!";
pub const THINKING_TEXT: &str = "Thinking...";
pub const NO_MODELS_TEXT: &str = "No models available";
pub const MODELS_FAILED_TEXT: &str = "Failed to load models";
