use tracing::{debug, error};

use super::{App, AppAction, AppCommand};
use crate::core::app::{ChatPhase, ChatView, PlaceholderStatus};
use crate::core::chat_stream::SendRequest;
use crate::core::message::Message;

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::StreamFragment {
            request_id,
            fragment,
        } => {
            let Some(placeholder) = app.chat.placeholder_for(request_id) else {
                debug!(request_id, "Dropping fragment for a stale request");
                return None;
            };
            placeholder.content.push_str(&fragment);
            placeholder.status = PlaceholderStatus::Streaming;
            app.follow_newest();
            None
        }
        AppAction::StreamCost { request_id, cost } => {
            if app.chat.owns(request_id) {
                app.cost += cost;
            }
            None
        }
        AppAction::StreamCompleted {
            request_id,
            outcome,
        } => {
            if !app.chat.owns(request_id) {
                debug!(request_id, "Dropping completion for a stale request");
                return None;
            }
            match outcome.messages {
                Some(messages) => app.chat = ChatView::loaded(messages),
                None => {
                    if let Some(transcript) = app.chat.transcript_mut() {
                        transcript.placeholder = None;
                        transcript.messages.push(Message::assistant(outcome.content));
                    }
                }
            }
            app.phase = ChatPhase::Idle;
            app.follow_newest();
            None
        }
        AppAction::StreamFailed {
            request_id,
            message,
        } => {
            let Some(placeholder) = app.chat.placeholder_for(request_id) else {
                return None;
            };
            error!(request_id, %message, "Send failed");
            placeholder.status = PlaceholderStatus::Failed(message);
            app.phase = ChatPhase::Idle;
            app.follow_newest();
            None
        }
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

/// Validate the composer and start a send. Rejections are only logged; the
/// shell shows nothing and issues no request.
pub(super) fn submit_message(app: &mut App) -> Option<AppCommand> {
    if app.composer.input().trim().is_empty() {
        error!("Refusing to send an empty message");
        return None;
    }
    let Some(session_id) = app.selected_session().map(str::to_string) else {
        error!("Refusing to send without a selected session");
        return None;
    };
    if app.phase == ChatPhase::LoadingHistory {
        error!(%session_id, "Refusing to send while history is loading");
        return None;
    }
    let Some(model) = app.selected_model().map(str::to_string) else {
        error!("Refusing to send without a selected model");
        return None;
    };

    let prompt = app.composer.take_input();
    let file_ids = app.composer.file_ids();
    app.composer.attachments.clear();
    app.models.reconcile(false);

    let request_id = app.next_request_id();
    app.chat.begin_send(&prompt, request_id);
    app.phase = ChatPhase::Sending;
    app.status = None;
    app.follow_newest();
    debug!(request_id, %session_id, %model, files = file_ids.len(), "Submitting message");

    Some(AppCommand::SendMessage(SendRequest {
        request_id,
        session_id,
        prompt,
        model,
        file_ids,
        history_limit: app.history_limit,
    }))
}
