//! Key handling for the chat shell.
//!
//! Keys resolve to [`AppAction`]s from the current [`KeyContext`]; the
//! loop dispatches whatever comes back.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{App, AppAction, ComposerMode, Focus};

/// Lines moved by PageUp/PageDown in the transcript.
pub const PAGE_SCROLL_LINES: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Sidebar,
    Typing,
    Prompt,
    ModelPicker,
}

impl KeyContext {
    pub fn from_app(app: &App) -> Self {
        if app.composer.mode != ComposerMode::Message {
            return KeyContext::Prompt;
        }
        match app.focus {
            Focus::Sidebar => KeyContext::Sidebar,
            Focus::Composer => KeyContext::Typing,
            Focus::ModelPicker => KeyContext::ModelPicker,
        }
    }
}

/// Bindings that work everywhere.
fn global_action(key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(AppAction::Quit),
        KeyCode::Char('n') if ctrl => Some(AppAction::BeginNewSession),
        KeyCode::Char('o') if ctrl => Some(AppAction::BeginAttach),
        KeyCode::Char('x') if ctrl => Some(AppAction::RemoveLastAttachment),
        KeyCode::PageUp => Some(AppAction::ScrollUp {
            lines: PAGE_SCROLL_LINES,
        }),
        KeyCode::PageDown => Some(AppAction::ScrollDown {
            lines: PAGE_SCROLL_LINES,
        }),
        _ => None,
    }
}

fn editing_action(key: &KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Enter => Some(AppAction::SubmitComposer),
        KeyCode::Backspace => Some(AppAction::Backspace),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(AppAction::InsertChar { ch })
        }
        _ => None,
    }
}

pub fn resolve_key(context: KeyContext, key: &KeyEvent) -> Option<AppAction> {
    if context == KeyContext::Prompt {
        // Prompts own the input line; only quitting and cancelling escape them.
        return match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(AppAction::Quit)
            }
            KeyCode::Esc => Some(AppAction::CancelPrompt),
            _ => editing_action(key),
        };
    }

    if let Some(action) = global_action(key) {
        return Some(action);
    }
    if key.code == KeyCode::Tab {
        return Some(AppAction::FocusNext);
    }

    match context {
        KeyContext::Sidebar => match key.code {
            KeyCode::Up => Some(AppAction::SidebarMoveUp),
            KeyCode::Down => Some(AppAction::SidebarMoveDown),
            KeyCode::Enter => Some(AppAction::SelectHighlightedSession),
            _ => None,
        },
        KeyContext::ModelPicker => match key.code {
            KeyCode::Up | KeyCode::Left => Some(AppAction::CycleModel { forward: false }),
            KeyCode::Down | KeyCode::Right => Some(AppAction::CycleModel { forward: true }),
            _ => None,
        },
        KeyContext::Typing => match key.code {
            KeyCode::Up => Some(AppAction::ScrollUp { lines: 1 }),
            KeyCode::Down => Some(AppAction::ScrollDown { lines: 1 }),
            _ => editing_action(key),
        },
        KeyContext::Prompt => None,
    }
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

pub fn paste_action(text: &str) -> Option<AppAction> {
    let text = sanitize_pasted_text(text);
    if text.is_empty() {
        None
    } else {
        Some(AppAction::InsertText { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn context_follows_focus_and_prompts() {
        let mut app = create_test_app();
        assert_eq!(KeyContext::from_app(&app), KeyContext::Typing);
        app.focus = Focus::Sidebar;
        assert_eq!(KeyContext::from_app(&app), KeyContext::Sidebar);
        app.composer.begin_prompt(ComposerMode::SessionTitle);
        assert_eq!(KeyContext::from_app(&app), KeyContext::Prompt);
    }

    #[test]
    fn typing_edits_and_submits() {
        assert_eq!(
            resolve_key(KeyContext::Typing, &key(KeyCode::Char('a'))),
            Some(AppAction::InsertChar { ch: 'a' })
        );
        assert_eq!(
            resolve_key(KeyContext::Typing, &key(KeyCode::Enter)),
            Some(AppAction::SubmitComposer)
        );
        assert_eq!(
            resolve_key(KeyContext::Typing, &key(KeyCode::Backspace)),
            Some(AppAction::Backspace)
        );
    }

    #[test]
    fn sidebar_navigates_and_selects() {
        assert_eq!(
            resolve_key(KeyContext::Sidebar, &key(KeyCode::Down)),
            Some(AppAction::SidebarMoveDown)
        );
        assert_eq!(
            resolve_key(KeyContext::Sidebar, &key(KeyCode::Enter)),
            Some(AppAction::SelectHighlightedSession)
        );
        assert_eq!(resolve_key(KeyContext::Sidebar, &key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn model_picker_cycles() {
        assert_eq!(
            resolve_key(KeyContext::ModelPicker, &key(KeyCode::Down)),
            Some(AppAction::CycleModel { forward: true })
        );
        assert_eq!(
            resolve_key(KeyContext::ModelPicker, &key(KeyCode::Up)),
            Some(AppAction::CycleModel { forward: false })
        );
    }

    #[test]
    fn control_chords_are_global_outside_prompts() {
        for context in [KeyContext::Sidebar, KeyContext::Typing, KeyContext::ModelPicker] {
            assert_eq!(resolve_key(context, &ctrl('c')), Some(AppAction::Quit));
            assert_eq!(
                resolve_key(context, &ctrl('n')),
                Some(AppAction::BeginNewSession)
            );
            assert_eq!(resolve_key(context, &ctrl('o')), Some(AppAction::BeginAttach));
            assert_eq!(
                resolve_key(context, &key(KeyCode::Tab)),
                Some(AppAction::FocusNext)
            );
        }
    }

    #[test]
    fn prompts_only_edit_cancel_or_quit() {
        assert_eq!(
            resolve_key(KeyContext::Prompt, &key(KeyCode::Esc)),
            Some(AppAction::CancelPrompt)
        );
        assert_eq!(resolve_key(KeyContext::Prompt, &ctrl('n')), None);
        assert_eq!(resolve_key(KeyContext::Prompt, &key(KeyCode::Tab)), None);
        assert_eq!(resolve_key(KeyContext::Prompt, &ctrl('c')), Some(AppAction::Quit));
        assert_eq!(
            resolve_key(KeyContext::Prompt, &key(KeyCode::Enter)),
            Some(AppAction::SubmitComposer)
        );
    }

    #[test]
    fn paste_is_sanitized() {
        assert_eq!(
            paste_action("a\r\nb\tc\u{7}"),
            Some(AppAction::InsertText {
                text: "a\nb    c".to_string()
            })
        );
        assert_eq!(paste_action("\u{1b}"), None);
    }
}
