use super::*;
use crate::api::Session;
use crate::core::chat_stream::{SendOutcome, SendRequest};
use crate::core::message::{FileAttachment, Message};
use crate::utils::test_utils::{create_test_app, create_test_messages, model};

fn app_with_session(session_id: &str) -> App {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SessionsLoaded {
            sessions: vec![Session {
                id: session_id.to_string(),
                title: "Trip planning".to_string(),
            }],
        },
    );
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: session_id.to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::HistoryLoaded {
            session_id: session_id.to_string(),
            messages: Vec::new(),
        },
    );
    app
}

fn type_text(app: &mut App, text: &str) {
    apply_action(
        app,
        AppAction::InsertText {
            text: text.to_string(),
        },
    );
}

fn submit(app: &mut App, text: &str) -> Option<SendRequest> {
    type_text(app, text);
    match apply_action(app, AppAction::SubmitComposer) {
        Some(AppCommand::SendMessage(request)) => Some(request),
        Some(other) => panic!("unexpected command {other:?}"),
        None => None,
    }
}

fn uploaded(name: &str) -> FileAttachment {
    FileAttachment {
        name: name.to_string(),
        file_id: Some(format!("id-{name}")),
        error: false,
    }
}

#[test]
fn startup_loads_sessions_and_models() {
    let app = create_test_app();
    assert_eq!(
        App::startup_commands(),
        vec![AppCommand::LoadSessions, AppCommand::LoadModels]
    );
    assert_eq!(app.phase, ChatPhase::Unselected);
    assert_eq!(app.chat.entries()[0].text, "No session selected.");
    assert_eq!(app.selected_model(), Some("gpt-4.1-mini"));
    assert_eq!(app.cost_label(), "Cost: $0.00");
}

#[test]
fn selecting_a_session_shows_loading_and_requests_history() {
    let mut app = create_test_app();
    app.composer.attachments.push(uploaded("a.png"));
    app.cost = 1.5;

    let cmd = apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "7".to_string(),
        },
    );

    assert_eq!(
        cmd,
        Some(AppCommand::LoadHistory {
            session_id: "7".to_string()
        })
    );
    assert_eq!(app.phase, ChatPhase::LoadingHistory);
    assert_eq!(app.chat.entries()[0].text, "Loading messages...");
    assert!(app.composer.attachments.is_empty());
    assert_eq!(app.cost, 0.0);
}

#[test]
fn empty_session_renders_one_empty_state_and_no_commands() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "7".to_string(),
        },
    );

    let commands = apply_actions(
        &mut app,
        [AppAction::HistoryLoaded {
            session_id: "7".to_string(),
            messages: Vec::new(),
        }],
    );

    assert!(commands.is_empty());
    let entries = app.chat.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Notice);
    assert_eq!(entries[0].text, "No messages yet. Start chatting!");
    assert_eq!(app.phase, ChatPhase::Idle);
}

#[test]
fn history_for_previous_selection_is_ignored() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "a".to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "b".to_string(),
        },
    );

    apply_action(
        &mut app,
        AppAction::HistoryLoaded {
            session_id: "a".to_string(),
            messages: create_test_messages(),
        },
    );
    assert_eq!(app.chat, ChatView::Loading);

    apply_action(
        &mut app,
        AppAction::HistoryLoadFailed {
            session_id: "a".to_string(),
            error: "late".to_string(),
        },
    );
    assert_eq!(app.chat, ChatView::Loading);
    assert_eq!(app.phase, ChatPhase::LoadingHistory);
}

#[test]
fn history_failure_is_shown_and_reselect_retries() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "a".to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::HistoryLoadFailed {
            session_id: "a".to_string(),
            error: "[error 500] boom".to_string(),
        },
    );

    assert_eq!(
        app.chat.entries()[0].text,
        "Failed to load messages: [error 500] boom"
    );
    assert_eq!(app.phase, ChatPhase::Idle);

    let retry = apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "a".to_string(),
        },
    );
    assert!(matches!(retry, Some(AppCommand::LoadHistory { .. })));
}

#[test]
fn submit_is_rejected_without_text_session_or_model() {
    let mut app = create_test_app();
    assert_eq!(submit(&mut app, "   "), None);
    assert_eq!(submit(&mut app, "hello"), None);
    assert!(app.status.is_none());

    let mut app = app_with_session("s1");
    apply_action(
        &mut app,
        AppAction::ModelsLoadFailed {
            error: "offline".to_string(),
        },
    );
    assert_eq!(submit(&mut app, "hello"), None);
    assert!(app.status.is_none());
    assert_eq!(app.phase, ChatPhase::Idle);
    assert_eq!(app.composer.input(), "hello");
}

#[test]
fn submit_while_history_loads_is_rejected() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "s1".to_string(),
        },
    );
    assert_eq!(submit(&mut app, "too soon"), None);
    assert_eq!(app.phase, ChatPhase::LoadingHistory);
    assert!(app.status.is_none());
}

#[test]
fn submit_shows_message_and_placeholder_and_clears_composer() {
    let mut app = app_with_session("s1");
    app.composer.attachments.push(uploaded("a.png"));
    app.composer.attachments.push(FileAttachment::failed("b.png"));

    let request = submit(&mut app, "Plan a trip").expect("send should start");

    assert_eq!(request.session_id, "s1");
    assert_eq!(request.prompt, "Plan a trip");
    assert_eq!(request.model, "gpt-4.1-mini");
    assert_eq!(request.file_ids, vec!["id-a.png".to_string()]);
    assert_eq!(request.history_limit, 30);
    assert_eq!(app.phase, ChatPhase::Sending);
    assert_eq!(app.composer.input(), "");
    assert!(app.composer.attachments.is_empty());

    let entries = app.chat.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::User);
    assert_eq!(entries[0].text, "Plan a trip");
    assert_eq!(entries[1].text, "Thinking...");
}

#[test]
fn fragments_render_accumulated_content_and_completion_replaces_transcript() {
    let mut app = app_with_session("s1");
    let request = submit(&mut app, "Hi").unwrap();
    let id = request.request_id;

    for fragment in ["Hel", "lo"] {
        apply_action(
            &mut app,
            AppAction::StreamFragment {
                request_id: id,
                fragment: fragment.to_string(),
            },
        );
    }
    apply_action(
        &mut app,
        AppAction::StreamCost {
            request_id: id,
            cost: 0.25,
        },
    );
    assert_eq!(app.chat.entries().last().unwrap().text, "Hello");
    assert_eq!(app.cost_label(), "Cost: $0.25");

    apply_action(
        &mut app,
        AppAction::StreamCompleted {
            request_id: id,
            outcome: SendOutcome {
                content: "Hello".to_string(),
                messages: Some(vec![Message::user("Hi"), Message::assistant("Hello [\\x]")]),
            },
        },
    );

    assert_eq!(app.phase, ChatPhase::Idle);
    let entries = app.chat.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].text, "Hello $\\x$");
}

#[test]
fn completion_without_transcript_keeps_local_reply() {
    let mut app = app_with_session("s1");
    let id = submit(&mut app, "Hi").unwrap().request_id;

    apply_action(
        &mut app,
        AppAction::StreamCompleted {
            request_id: id,
            outcome: SendOutcome {
                content: "Local".to_string(),
                messages: None,
            },
        },
    );

    let entries = app.chat.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].kind, EntryKind::Assistant);
    assert_eq!(entries[1].text, "Local");
}

#[test]
fn failure_replaces_placeholder_and_returns_to_idle() {
    let mut app = app_with_session("s1");
    let id = submit(&mut app, "Hi").unwrap().request_id;

    apply_action(
        &mut app,
        AppAction::StreamFailed {
            request_id: id,
            message: "[error 503] overloaded".to_string(),
        },
    );

    assert_eq!(app.phase, ChatPhase::Idle);
    let last = app.chat.entries().pop().unwrap();
    assert_eq!(last.kind, EntryKind::Error);
    assert_eq!(last.text, "[error 503] overloaded");
}

#[test]
fn stale_request_results_are_dropped() {
    let mut app = app_with_session("s1");
    let first = submit(&mut app, "one").unwrap().request_id;
    let second = submit(&mut app, "two").unwrap().request_id;
    assert_ne!(first, second);

    apply_action(
        &mut app,
        AppAction::StreamFragment {
            request_id: first,
            fragment: "late".to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamCost {
            request_id: first,
            cost: 3.0,
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamCompleted {
            request_id: first,
            outcome: SendOutcome {
                content: "late".to_string(),
                messages: Some(Vec::new()),
            },
        },
    );

    assert_eq!(app.phase, ChatPhase::Sending);
    assert_eq!(app.cost, 0.0);
    let entries = app.chat.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].text, "Thinking...");
}

#[test]
fn session_switch_orphans_in_flight_send() {
    let mut app = app_with_session("s1");
    let id = submit(&mut app, "Hi").unwrap().request_id;

    apply_action(
        &mut app,
        AppAction::SelectSession {
            session_id: "s2".to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::HistoryLoaded {
            session_id: "s2".to_string(),
            messages: Vec::new(),
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamFragment {
            request_id: id,
            fragment: "from s1".to_string(),
        },
    );

    assert_eq!(app.phase, ChatPhase::Idle);
    assert_eq!(app.chat.entries()[0].text, "No messages yet. Start chatting!");
}

#[test]
fn new_session_prompt_creates_and_reloads() {
    let mut app = create_test_app();
    type_text(&mut app, "draft");
    apply_action(&mut app, AppAction::BeginNewSession);
    assert_eq!(app.composer.mode, ComposerMode::SessionTitle);

    type_text(&mut app, "  Groceries ");
    let cmd = apply_action(&mut app, AppAction::SubmitComposer);
    assert_eq!(
        cmd,
        Some(AppCommand::CreateSession {
            title: "Groceries".to_string()
        })
    );
    assert_eq!(app.composer.mode, ComposerMode::Message);
    assert_eq!(app.composer.input(), "draft");

    let cmd = apply_action(
        &mut app,
        AppAction::SessionCreated {
            session: Session {
                id: "9".to_string(),
                title: "Groceries".to_string(),
            },
        },
    );
    assert_eq!(cmd, Some(AppCommand::LoadSessions));
}

#[test]
fn empty_session_title_is_a_no_op() {
    let mut app = create_test_app();
    apply_action(&mut app, AppAction::BeginNewSession);
    type_text(&mut app, "   ");
    assert_eq!(apply_action(&mut app, AppAction::SubmitComposer), None);
    assert_eq!(app.composer.mode, ComposerMode::Message);
}

#[test]
fn attachments_gate_models_and_follow_the_session() {
    let mut app = app_with_session("s1");
    apply_action(
        &mut app,
        AppAction::ModelsLoaded {
            models: vec![model("gpt-4.1-mini", false), model("vision-x", true)],
        },
    );
    assert_eq!(app.selected_model(), Some("gpt-4.1-mini"));

    apply_action(&mut app, AppAction::BeginAttach);
    type_text(&mut app, "/tmp/photo.png");
    let cmd = apply_action(&mut app, AppAction::SubmitComposer);
    assert_eq!(
        cmd,
        Some(AppCommand::UploadFile {
            path: "/tmp/photo.png".into(),
            session_id: Some("s1".to_string()),
        })
    );

    apply_action(
        &mut app,
        AppAction::AttachmentUploaded {
            session_id: Some("s1".to_string()),
            attachment: uploaded("photo.png"),
        },
    );
    assert_eq!(app.selected_model(), Some("vision-x"));
    assert_eq!(app.composer.chip_labels(), vec!["photo.png"]);

    apply_action(
        &mut app,
        AppAction::AttachmentUploaded {
            session_id: Some("other".to_string()),
            attachment: uploaded("stray.png"),
        },
    );
    assert_eq!(app.composer.attachments.len(), 1);

    apply_action(&mut app, AppAction::RemoveLastAttachment);
    assert!(app.composer.attachments.is_empty());
    assert_eq!(app.selected_model(), Some("vision-x"));
}

#[test]
fn failed_upload_shows_flagged_chip() {
    let mut app = app_with_session("s1");
    apply_action(
        &mut app,
        AppAction::AttachmentUploaded {
            session_id: Some("s1".to_string()),
            attachment: FileAttachment::failed("big.bin"),
        },
    );
    assert_eq!(app.composer.chip_labels(), vec!["big.bin (failed)"]);
    assert_eq!(app.status.as_deref(), Some("Upload failed: big.bin"));
}

#[test]
fn sidebar_navigation_selects_highlighted_session() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SessionsLoaded {
            sessions: vec![
                Session {
                    id: "1".to_string(),
                    title: "One".to_string(),
                },
                Session {
                    id: "2".to_string(),
                    title: "Two".to_string(),
                },
            ],
        },
    );
    apply_action(&mut app, AppAction::SidebarMoveDown);
    let cmd = apply_action(&mut app, AppAction::SelectHighlightedSession);
    assert_eq!(
        cmd,
        Some(AppCommand::LoadHistory {
            session_id: "2".to_string()
        })
    );
    assert_eq!(app.sidebar.selected_title(), Some("Two"));
}

#[test]
fn scrolling_back_is_reset_by_new_content() {
    let mut app = app_with_session("s1");
    let id = submit(&mut app, "Hi").unwrap().request_id;
    apply_action(&mut app, AppAction::ScrollUp { lines: 5 });
    assert_eq!(app.scroll_back, 5);

    apply_action(
        &mut app,
        AppAction::StreamFragment {
            request_id: id,
            fragment: "x".to_string(),
        },
    );
    assert_eq!(app.scroll_back, 0);
}
