//! Runs [`AppCommand`]s against the backend off the UI task.
//!
//! Every command finishes by dispatching an [`AppAction`]; nothing here
//! touches [`App`](crate::core::app::App) directly.

use std::sync::Arc;

use tracing::debug;

use crate::api::gateway::{load_sessions_or_offline, ChatBackend};
use crate::core::app::{AppAction, AppActionDispatcher, AppCommand};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};

#[derive(Clone)]
pub struct ExecutorContext {
    pub backend: Arc<dyn ChatBackend>,
    pub dispatcher: AppActionDispatcher,
    pub stream_service: ChatStreamService,
}

impl ExecutorContext {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        dispatcher: AppActionDispatcher,
        stream_service: ChatStreamService,
    ) -> Self {
        Self {
            backend,
            dispatcher,
            stream_service,
        }
    }

    pub fn execute(&self, command: AppCommand) {
        debug!(?command, "Executing command");
        if let AppCommand::SendMessage(request) = command {
            self.stream_service
                .spawn_send(self.backend.clone(), request);
            return;
        }
        let backend = self.backend.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            if let Some(action) = run_command(backend.as_ref(), command).await {
                dispatcher.dispatch(action);
            }
        });
    }
}

/// Perform one non-streaming command and describe its result.
pub async fn run_command(backend: &dyn ChatBackend, command: AppCommand) -> Option<AppAction> {
    let action = match command {
        AppCommand::LoadSessions => AppAction::SessionsLoaded {
            sessions: load_sessions_or_offline(backend).await,
        },
        AppCommand::CreateSession { title } => match backend.create_session(&title).await {
            Ok(session) => AppAction::SessionCreated { session },
            Err(err) => AppAction::SessionCreateFailed {
                error: err.to_string(),
            },
        },
        AppCommand::LoadHistory { session_id } => {
            match backend.list_messages(&session_id).await {
                Ok(messages) => AppAction::HistoryLoaded {
                    session_id,
                    messages,
                },
                Err(err) => AppAction::HistoryLoadFailed {
                    session_id,
                    error: err.to_string(),
                },
            }
        }
        AppCommand::LoadModels => match backend.list_models().await {
            Ok(models) => AppAction::ModelsLoaded { models },
            Err(err) => AppAction::ModelsLoadFailed {
                error: err.to_string(),
            },
        },
        AppCommand::UploadFile { path, session_id } => AppAction::AttachmentUploaded {
            session_id,
            attachment: backend.upload_file(&path).await,
        },
        AppCommand::SendMessage(_) => return None,
    };
    Some(action)
}

pub fn stream_action(message: StreamMessage, request_id: u64) -> AppAction {
    match message {
        StreamMessage::Fragment(fragment) => AppAction::StreamFragment {
            request_id,
            fragment,
        },
        StreamMessage::Cost(cost) => AppAction::StreamCost { request_id, cost },
        StreamMessage::Completed(outcome) => AppAction::StreamCompleted {
            request_id,
            outcome,
        },
        StreamMessage::Error(message) => AppAction::StreamFailed {
            request_id,
            message,
        },
    }
}
