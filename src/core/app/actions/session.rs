use tracing::{debug, warn};

use super::{App, AppAction, AppCommand};
use crate::core::app::{ChatPhase, ChatView, ComposerMode, Focus};

pub(super) fn handle_session_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SessionsLoaded { sessions } => {
            app.sidebar.set_sessions(sessions);
            None
        }
        AppAction::SidebarMoveUp => {
            app.sidebar.move_up();
            None
        }
        AppAction::SidebarMoveDown => {
            app.sidebar.move_down();
            None
        }
        AppAction::SelectHighlightedSession => {
            let session_id = app.sidebar.highlighted_session()?.id.clone();
            select_session(app, session_id)
        }
        AppAction::SelectSession { session_id } => select_session(app, session_id),
        AppAction::HistoryLoaded {
            session_id,
            messages,
        } => {
            if app.selected_session() != Some(session_id.as_str()) {
                debug!(%session_id, "Ignoring history for a session no longer selected");
                return None;
            }
            app.chat = ChatView::loaded(messages);
            app.phase = ChatPhase::Idle;
            app.follow_newest();
            None
        }
        AppAction::HistoryLoadFailed { session_id, error } => {
            if app.selected_session() != Some(session_id.as_str()) {
                return None;
            }
            warn!(%session_id, %error, "Failed to load messages");
            app.chat = ChatView::Failed(error);
            app.phase = ChatPhase::Idle;
            None
        }
        AppAction::BeginNewSession => {
            app.composer.begin_prompt(ComposerMode::SessionTitle);
            app.focus = Focus::Composer;
            None
        }
        AppAction::SessionCreated { session } => {
            app.set_status(format!("Created session: {}", session.title));
            app.sidebar.loading = true;
            Some(AppCommand::LoadSessions)
        }
        AppAction::SessionCreateFailed { error } => {
            warn!(%error, "Failed to create session");
            app.set_status(format!("Could not create session: {error}"));
            None
        }
        _ => unreachable!("non-session action routed to session handler"),
    }
}

/// Switch to `session_id`. Any in-flight send keeps running; its results no
/// longer match a placeholder and are dropped.
pub(super) fn select_session(app: &mut App, session_id: String) -> Option<AppCommand> {
    debug!(%session_id, "Session selected");
    app.sidebar.selected = Some(session_id.clone());
    if let Some(index) = app
        .sidebar
        .sessions
        .iter()
        .position(|session| session.id == session_id)
    {
        app.sidebar.highlighted = index;
    }
    app.composer.attachments.clear();
    app.models.reconcile(false);
    app.cost = 0.0;
    app.chat = ChatView::Loading;
    app.phase = ChatPhase::LoadingHistory;
    app.follow_newest();
    Some(AppCommand::LoadHistory { session_id })
}
