//! Flattening chat entries into width-wrapped terminal lines.
//!
//! Lines are wrapped here rather than by `Paragraph` so the line count used
//! for scrolling matches what is drawn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::{ChatEntry, EntryKind};
use crate::core::message::Role;
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::theme::Theme;

#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub width: usize,
    pub markdown_enabled: bool,
}

pub fn build_chat_lines(
    entries: &[ChatEntry],
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        for line in entry_lines(entry, theme, config.markdown_enabled) {
            lines.extend(wrap_line(&line, config.width));
        }
    }
    lines
}

fn entry_lines(entry: &ChatEntry, theme: &Theme, markdown: bool) -> Vec<Line<'static>> {
    let (prefix, body) = match entry.kind {
        EntryKind::User => (
            Some(Span::styled(
                format!("{}: ", Role::User.display_prefix()),
                theme.user_prefix_style,
            )),
            render_plain(&entry.text, theme.user_text_style),
        ),
        EntryKind::Assistant => {
            let body = if markdown {
                render_markdown(&entry.text, theme.assistant_text_style, theme)
            } else {
                render_plain(&entry.text, theme.assistant_text_style)
            };
            (
                Some(Span::styled(
                    format!("{}: ", Role::Assistant.display_prefix()),
                    theme.assistant_prefix_style,
                )),
                body,
            )
        }
        EntryKind::Notice => (None, render_plain(&entry.text, theme.notice_text_style)),
        EntryKind::Error => (None, render_plain(&entry.text, theme.error_text_style)),
    };

    let mut lines = body;
    if let Some(prefix) = prefix {
        match lines.first_mut() {
            Some(first) => first.spans.insert(0, prefix),
            None => lines.push(Line::from(prefix)),
        }
    }
    lines
}

/// Split into runs of whitespace and non-whitespace.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut last_space = None;
    for (index, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        if last_space.is_some_and(|last| last != is_space) {
            tokens.push(&text[start..index]);
            start = index;
        }
        last_space = Some(is_space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Word-wrap a styled line to `width` columns, hard-breaking words that are
/// wider than a whole row. Whitespace at a wrap point is dropped, so rows never
/// end or start with the gap they were split at.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }
    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;
    // Whitespace since the last word, placed only once we know what follows.
    let mut gap: Vec<Span<'static>> = Vec::new();
    let mut gap_width = 0usize;

    for span in &line.spans {
        let style: Style = span.style;
        for token in split_tokens(&span.content) {
            let token_width = token.width();
            if token.trim().is_empty() {
                if used == 0 && !out.is_empty() {
                    continue;
                }
                gap.push(Span::styled(token.to_string(), style));
                gap_width += token_width;
                continue;
            }

            if used > 0 && used + gap_width + token_width > width {
                out.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            } else if used + gap_width <= width {
                current.append(&mut gap);
                used += gap_width;
            }
            gap.clear();
            gap_width = 0;

            if used + token_width <= width {
                current.push(Span::styled(token.to_string(), style));
                used += token_width;
                continue;
            }
            let mut chunk = String::new();
            for ch in token.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    if !chunk.is_empty() {
                        current.push(Span::styled(std::mem::take(&mut chunk), style));
                    }
                    out.push(Line::from(std::mem::take(&mut current)));
                    used = 0;
                }
                chunk.push(ch);
                used += ch_width;
            }
            if !chunk.is_empty() {
                current.push(Span::styled(chunk, style));
            }
        }
    }
    if !gap.is_empty() && used + gap_width <= width && (used > 0 || out.is_empty()) {
        current.append(&mut gap);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(Line::from(current));
    }
    out
}
