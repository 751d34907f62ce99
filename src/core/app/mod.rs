//! Application state for the interactive client.
//!
//! [`App`] is plain data. Everything that changes it goes through
//! [`actions::apply_action`], which returns [`AppCommand`]s describing the
//! backend work to run; results come back as further actions.

use crate::core::config::Config;

pub mod actions;
pub mod chat_view;
pub mod composer;
pub mod model_picker;
pub mod sidebar;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use chat_view::{ChatEntry, ChatView, EntryKind, Placeholder, PlaceholderStatus};
pub use composer::{Composer, ComposerMode};
pub use model_picker::{ModelList, ModelPicker};
pub use sidebar::Sidebar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    #[default]
    Unselected,
    LoadingHistory,
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Sidebar,
    #[default]
    Composer,
    ModelPicker,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Composer,
            Focus::Composer => Focus::ModelPicker,
            Focus::ModelPicker => Focus::Sidebar,
        }
    }
}

pub struct App {
    pub phase: ChatPhase,
    pub focus: Focus,
    pub sidebar: Sidebar,
    pub chat: ChatView,
    pub composer: Composer,
    pub models: ModelPicker,
    /// Running cost of the selected session.
    pub cost: f64,
    /// Lines scrolled up from the newest content; zero follows the stream.
    pub scroll_back: u16,
    pub status: Option<String>,
    pub history_limit: usize,
    pub markdown: bool,
    pub should_quit: bool,
    last_request_id: u64,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: ChatPhase::Unselected,
            focus: Focus::Composer,
            sidebar: Sidebar {
                loading: true,
                ..Default::default()
            },
            chat: ChatView::NoSession,
            composer: Composer::default(),
            models: ModelPicker::new(Some(config.default_model().to_string())),
            cost: 0.0,
            scroll_back: 0,
            status: None,
            history_limit: config.history_limit(),
            markdown: config.markdown_enabled(),
            should_quit: false,
            last_request_id: 0,
        }
    }

    /// Work to kick off as soon as the shell is on screen.
    pub fn startup_commands() -> Vec<AppCommand> {
        vec![AppCommand::LoadSessions, AppCommand::LoadModels]
    }

    pub fn selected_session(&self) -> Option<&str> {
        self.sidebar.selected.as_deref()
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.models.selected.as_deref()
    }

    pub fn cost_label(&self) -> String {
        format!("Cost: ${:.2}", self.cost)
    }

    pub(crate) fn next_request_id(&mut self) -> u64 {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn follow_newest(&mut self) {
        self.scroll_back = 0;
    }
}

#[cfg(test)]
mod tests;
