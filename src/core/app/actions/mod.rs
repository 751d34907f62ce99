mod input;
mod session;
mod streaming;

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::App;
use crate::api::{ModelInfo, Session};
use crate::core::chat_stream::{SendOutcome, SendRequest};
use crate::core::message::{FileAttachment, Message};

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SessionsLoaded {
        sessions: Vec<Session>,
    },
    SidebarMoveUp,
    SidebarMoveDown,
    SelectHighlightedSession,
    SelectSession {
        session_id: String,
    },
    HistoryLoaded {
        session_id: String,
        messages: Vec<Message>,
    },
    HistoryLoadFailed {
        session_id: String,
        error: String,
    },
    BeginNewSession,
    SessionCreated {
        session: Session,
    },
    SessionCreateFailed {
        error: String,
    },
    ModelsLoaded {
        models: Vec<ModelInfo>,
    },
    ModelsLoadFailed {
        error: String,
    },
    CycleModel {
        forward: bool,
    },
    InsertChar {
        ch: char,
    },
    InsertText {
        text: String,
    },
    Backspace,
    BeginAttach,
    AttachmentUploaded {
        session_id: Option<String>,
        attachment: FileAttachment,
    },
    RemoveLastAttachment,
    CancelPrompt,
    SubmitComposer,
    StreamFragment {
        request_id: u64,
        fragment: String,
    },
    StreamCost {
        request_id: u64,
        cost: f64,
    },
    StreamCompleted {
        request_id: u64,
        outcome: SendOutcome,
    },
    StreamFailed {
        request_id: u64,
        message: String,
    },
    FocusNext,
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    ClearStatus,
    Quit,
}

/// Backend work requested by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    LoadSessions,
    CreateSession {
        title: String,
    },
    LoadHistory {
        session_id: String,
    },
    LoadModels,
    UploadFile {
        path: PathBuf,
        session_id: Option<String>,
    },
    SendMessage(SendRequest),
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            self.dispatch(action);
        }
    }
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SessionsLoaded { .. }
        | AppAction::SidebarMoveUp
        | AppAction::SidebarMoveDown
        | AppAction::SelectHighlightedSession
        | AppAction::SelectSession { .. }
        | AppAction::HistoryLoaded { .. }
        | AppAction::HistoryLoadFailed { .. }
        | AppAction::BeginNewSession
        | AppAction::SessionCreated { .. }
        | AppAction::SessionCreateFailed { .. } => session::handle_session_action(app, action),

        AppAction::StreamFragment { .. }
        | AppAction::StreamCost { .. }
        | AppAction::StreamCompleted { .. }
        | AppAction::StreamFailed { .. } => streaming::handle_streaming_action(app, action),

        AppAction::ModelsLoaded { .. }
        | AppAction::ModelsLoadFailed { .. }
        | AppAction::CycleModel { .. }
        | AppAction::InsertChar { .. }
        | AppAction::InsertText { .. }
        | AppAction::Backspace
        | AppAction::BeginAttach
        | AppAction::AttachmentUploaded { .. }
        | AppAction::RemoveLastAttachment
        | AppAction::CancelPrompt
        | AppAction::SubmitComposer
        | AppAction::FocusNext
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::ClearStatus
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
