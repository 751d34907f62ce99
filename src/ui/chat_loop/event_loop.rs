//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on its own task and forwarded as [`UiEvent`]s.
//! Each turn of the loop applies queued input, stream progress and backend
//! results to the [`App`](crate::core::app::App), runs the commands those
//! produce, and redraws when anything changed.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::api::gateway::ChatBackend;
use crate::core::app::{apply_action, apply_actions, App, AppAction, AppActionDispatcher};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::config::Config;
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

use super::executors::{stream_action, ExecutorContext};
use super::keybindings::{paste_action, resolve_key, KeyContext};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.should_quit).await
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    theme: &Theme,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.read(|app| terminal_guard.draw(|f| ui(f, app, theme)))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Resolve and apply a key against the current state in one step, so the
/// next key in the same batch sees its effect.
async fn route_keyboard_event(app: &AppHandle, executor: &ExecutorContext, key: KeyEvent) {
    let commands = app
        .update(|app| {
            let context = KeyContext::from_app(app);
            resolve_key(context, &key)
                .and_then(|action| apply_action(app, action))
                .into_iter()
                .collect::<Vec<_>>()
        })
        .await;
    for command in commands {
        executor.execute(command);
    }
}

/// Apply a paste in place, keeping it ordered with the keys around it.
async fn route_paste_event(app: &AppHandle, executor: &ExecutorContext, text: &str) {
    let Some(action) = paste_action(text) else {
        return;
    };
    if let Some(command) = app.update(|app| apply_action(app, action)).await {
        executor.execute(command);
    }
}

/// Returns whether any event was processed.
async fn process_ui_events(
    app: &AppHandle,
    executor: &ExecutorContext,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> bool {
    let mut processed = false;
    while let Ok(ev) = event_rx.try_recv() {
        processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                route_keyboard_event(app, executor, key).await;
                if is_exit_requested(app).await {
                    break;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                route_paste_event(app, executor, &text).await;
            }
            UiEvent::Crossterm(_) => {}
        }
    }
    processed
}

/// Drain stream progress, merging adjacent fragments of the same request.
pub(crate) fn collect_stream_actions(
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
) -> Vec<AppAction> {
    let mut actions: Vec<AppAction> = Vec::new();
    while let Ok((message, request_id)) = rx.try_recv() {
        if let StreamMessage::Fragment(fragment) = &message {
            if let Some(AppAction::StreamFragment {
                request_id: pending_id,
                fragment: pending,
            }) = actions.last_mut()
            {
                if *pending_id == request_id {
                    pending.push_str(fragment);
                    continue;
                }
            }
        }
        actions.push(stream_action(message, request_id));
    }
    actions
}

/// Apply everything queued for the app and run the resulting commands.
/// Returns whether any action was applied.
pub(crate) async fn drain_action_queue(
    app: &AppHandle,
    executor: &ExecutorContext,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }
    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for command in commands {
        executor.execute(command);
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(
    config: Config,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn Error>> {
    let app = AppHandle::new(Arc::new(Mutex::new(App::new(&config))));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let (stream_service, mut stream_rx) = ChatStreamService::new();
    let executor = ExecutorContext::new(backend, dispatcher.clone(), stream_service);

    info!(base_url = %config.base_url(), "Starting chat shell");
    for command in App::startup_commands() {
        executor.execute(command);
    }

    let terminal = setup_terminal()?;
    let theme = Theme::default();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &theme,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let events_processed = process_ui_events(&app, &executor, &mut event_rx).await;
        if events_processed {
            request_redraw = true;
        }

        let stream_actions = collect_stream_actions(&mut stream_rx);
        let received_any = !stream_actions.is_empty();
        if received_any {
            dispatcher.dispatch_many(stream_actions);
        }

        let actions_applied = drain_action_queue(&app, &executor, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        if !events_processed && !received_any && !actions_applied && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    debug!("Chat shell closed");

    result
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;
