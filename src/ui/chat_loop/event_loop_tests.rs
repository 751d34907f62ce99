use super::*;
use crate::core::app::{ChatEntry, ChatPhase, EntryKind};
use crate::core::chat_stream::SendOutcome;
use crate::utils::test_utils::{create_test_app, model, FakeBackend};
use ratatui::crossterm::event::{KeyCode, KeyModifiers};

struct Harness {
    app: AppHandle,
    executor: ExecutorContext,
    action_rx: mpsc::UnboundedReceiver<AppAction>,
    stream_rx: mpsc::UnboundedReceiver<(StreamMessage, u64)>,
}

impl Harness {
    fn new(backend: FakeBackend) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (stream_service, stream_rx) = ChatStreamService::new();
        let executor = ExecutorContext::new(
            Arc::new(backend),
            AppActionDispatcher::new(action_tx),
            stream_service,
        );
        Self {
            app: AppHandle::new(Arc::new(Mutex::new(create_test_app()))),
            executor,
            action_rx,
            stream_rx,
        }
    }

    async fn apply(&self, action: AppAction) {
        let command = self.app.update(|app| apply_action(app, action)).await;
        if let Some(command) = command {
            self.executor.execute(command);
        }
    }

    async fn pump_until(&mut self, done: impl Fn(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let stream_actions = collect_stream_actions(&mut self.stream_rx);
                self.executor.dispatcher.dispatch_many(stream_actions);
                drain_action_queue(&self.app, &self.executor, &mut self.action_rx).await;
                if self.app.read(|app| done(app)).await {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("app never reached the expected state");
    }
}

#[tokio::test]
async fn paste_and_keys_apply_in_arrival_order() {
    let harness = Harness::new(FakeBackend::new());
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let key = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
    event_tx.send(UiEvent::Crossterm(Event::Key(key('>')))).unwrap();
    event_tx
        .send(UiEvent::Crossterm(Event::Paste("pasted".to_string())))
        .unwrap();
    event_tx.send(UiEvent::Crossterm(Event::Key(key('!')))).unwrap();

    assert!(process_ui_events(&harness.app, &harness.executor, &mut event_rx).await);

    let input = harness
        .app
        .read(|app| app.composer.input().to_string())
        .await;
    assert_eq!(input, ">pasted!");
}

#[test]
fn adjacent_fragments_of_one_request_are_merged() {
    let (service, mut rx) = ChatStreamService::new();
    service.send_for_test(StreamMessage::Fragment("Hel".into()), 1);
    service.send_for_test(StreamMessage::Fragment("lo".into()), 1);
    service.send_for_test(StreamMessage::Cost(0.5), 1);
    service.send_for_test(StreamMessage::Fragment("!".into()), 1);
    service.send_for_test(StreamMessage::Fragment("late".into()), 2);

    assert_eq!(
        collect_stream_actions(&mut rx),
        vec![
            AppAction::StreamFragment {
                request_id: 1,
                fragment: "Hello".into()
            },
            AppAction::StreamCost {
                request_id: 1,
                cost: 0.5
            },
            AppAction::StreamFragment {
                request_id: 1,
                fragment: "!".into()
            },
            AppAction::StreamFragment {
                request_id: 2,
                fragment: "late".into()
            },
        ]
    );
}

#[test]
fn completion_is_never_merged_into_fragments() {
    let (service, mut rx) = ChatStreamService::new();
    service.send_for_test(StreamMessage::Fragment("a".into()), 4);
    service.send_for_test(
        StreamMessage::Completed(SendOutcome {
            content: "a".into(),
            messages: None,
        }),
        4,
    );
    let actions = collect_stream_actions(&mut rx);
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[1], AppAction::StreamCompleted { request_id: 4, .. }));
}

#[tokio::test]
async fn startup_fills_sidebar_and_model_picker() {
    let backend = FakeBackend::new()
        .with_sessions(&[("s1", "Groceries"), ("s2", "Trip")])
        .with_models(vec![model("gpt-4.1-mini", false)]);
    let mut harness = Harness::new(backend);
    for command in App::startup_commands() {
        harness.executor.execute(command);
    }
    harness
        .pump_until(|app| !app.sidebar.loading && !app.models.models().is_empty())
        .await;

    let (titles, model) = harness
        .app
        .read(|app| {
            (
                app.sidebar
                    .sessions
                    .iter()
                    .map(|session| session.title.clone())
                    .collect::<Vec<_>>(),
                app.selected_model().map(str::to_string),
            )
        })
        .await;
    assert_eq!(titles, vec!["Groceries", "Trip"]);
    assert_eq!(model.as_deref(), Some("gpt-4.1-mini"));
}

#[tokio::test]
async fn full_send_round_trip_updates_transcript_and_cost() {
    let backend = FakeBackend::new()
        .with_sessions(&[("s1", "Groceries")])
        .with_models(vec![model("gpt-4.1-mini", false)])
        .with_chat_body(&[
            "{\"content\":\"Hel\"}\n{\"content\":\"lo\",",
            "\"cost\":0.25}\n",
        ]);
    let mut harness = Harness::new(backend);
    harness.executor.execute(crate::core::app::AppCommand::LoadModels);
    harness.pump_until(|app| !app.models.models().is_empty()).await;

    harness
        .apply(AppAction::SelectSession {
            session_id: "s1".into(),
        })
        .await;
    harness.pump_until(|app| app.phase == ChatPhase::Idle).await;
    assert_eq!(
        harness.app.read(|app| app.chat.entries()).await,
        vec![ChatEntry::notice("No messages yet. Start chatting!")]
    );

    harness
        .apply(AppAction::InsertText { text: "Hi".into() })
        .await;
    harness.apply(AppAction::SubmitComposer).await;
    assert_eq!(
        harness.app.read(|app| app.phase).await,
        ChatPhase::Sending
    );

    harness.pump_until(|app| app.phase == ChatPhase::Idle).await;
    let (entries, cost) = harness
        .app
        .read(|app| (app.chat.entries(), app.cost_label()))
        .await;
    assert_eq!(
        entries,
        vec![
            ChatEntry {
                kind: EntryKind::User,
                text: "Hi".into()
            },
            ChatEntry {
                kind: EntryKind::Assistant,
                text: "Hello".into()
            },
        ]
    );
    assert_eq!(cost, "Cost: $0.25");
}

#[tokio::test]
async fn rejected_chat_shows_inline_error_and_returns_to_idle() {
    let backend = FakeBackend::new()
        .with_models(vec![model("gpt-4.1-mini", false)])
        .with_chat_status(503, "overloaded");
    let mut harness = Harness::new(backend);
    harness.executor.execute(crate::core::app::AppCommand::LoadModels);
    harness.pump_until(|app| !app.models.models().is_empty()).await;
    harness
        .apply(AppAction::SelectSession {
            session_id: "s1".into(),
        })
        .await;
    harness.pump_until(|app| app.phase == ChatPhase::Idle).await;

    harness
        .apply(AppAction::InsertText { text: "Hi".into() })
        .await;
    harness.apply(AppAction::SubmitComposer).await;
    harness.pump_until(|app| app.phase == ChatPhase::Idle).await;

    let entries = harness.app.read(|app| app.chat.entries()).await;
    assert_eq!(
        entries.last(),
        Some(&ChatEntry {
            kind: EntryKind::Error,
            text: "[error 503] overloaded".into()
        })
    );
}
