use std::path::PathBuf;

use tracing::warn;

use super::{streaming, App, AppAction, AppCommand};
use crate::core::app::{ComposerMode, Focus};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ModelsLoaded { models } => {
            let has_attachments = app.composer.has_attachments();
            app.models.set_models(models, has_attachments);
            None
        }
        AppAction::ModelsLoadFailed { error } => {
            warn!(%error, "Failed to load models");
            app.models.set_failed();
            None
        }
        AppAction::CycleModel { forward } => {
            let has_attachments = app.composer.has_attachments();
            app.models.cycle(has_attachments, forward);
            None
        }
        AppAction::InsertChar { ch } => {
            app.composer.insert_char(ch);
            None
        }
        AppAction::InsertText { text } => {
            app.composer.insert_str(&text);
            None
        }
        AppAction::Backspace => {
            app.composer.backspace();
            None
        }
        AppAction::BeginAttach => {
            app.composer.begin_prompt(ComposerMode::AttachPath);
            app.focus = Focus::Composer;
            None
        }
        AppAction::AttachmentUploaded {
            session_id,
            attachment,
        } => {
            if session_id.as_deref() != app.selected_session() {
                warn!(file = %attachment.name, "Dropping upload finished after a session switch");
                return None;
            }
            if attachment.error {
                app.set_status(format!("Upload failed: {}", attachment.name));
            }
            app.composer.attachments.push(attachment);
            app.models.reconcile(true);
            None
        }
        AppAction::RemoveLastAttachment => {
            app.composer.remove_last_attachment();
            let has_attachments = app.composer.has_attachments();
            app.models.reconcile(has_attachments);
            None
        }
        AppAction::CancelPrompt => {
            if app.composer.mode != ComposerMode::Message {
                app.composer.end_prompt();
            }
            None
        }
        AppAction::SubmitComposer => match app.composer.mode {
            ComposerMode::Message => streaming::submit_message(app),
            ComposerMode::SessionTitle => {
                let title = app.composer.take_input();
                app.composer.end_prompt();
                let title = title.trim();
                if title.is_empty() {
                    return None;
                }
                Some(AppCommand::CreateSession {
                    title: title.to_string(),
                })
            }
            ComposerMode::AttachPath => {
                let path = app.composer.take_input();
                app.composer.end_prompt();
                let path = path.trim();
                if path.is_empty() {
                    return None;
                }
                Some(AppCommand::UploadFile {
                    path: PathBuf::from(path),
                    session_id: app.selected_session().map(str::to_string),
                })
            }
        },
        AppAction::FocusNext => {
            app.focus = app.focus.next();
            None
        }
        AppAction::ScrollUp { lines } => {
            app.scroll_back = app.scroll_back.saturating_add(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            app.scroll_back = app.scroll_back.saturating_sub(lines);
            None
        }
        AppAction::ClearStatus => {
            app.status = None;
            None
        }
        AppAction::Quit => {
            app.should_quit = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}
