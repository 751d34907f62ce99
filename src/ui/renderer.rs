use crate::core::app::{App, ChatPhase, Focus};
use crate::core::constants::INDICATOR_SPACE;
use crate::ui::layout::{build_chat_lines, LayoutConfig};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const SIDEBAR_WIDTH: u16 = 28;

pub fn ui(f: &mut Frame, app: &App, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_sidebar(f, app, theme, columns[0]);

    // Chips get their own row above the input line
    let composer_height = if app.composer.has_attachments() { 4 } else { 3 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(composer_height),
        ])
        .split(columns[1]);

    render_top_bar(f, app, theme, rows[0]);
    render_chat(f, app, theme, rows[1]);
    render_composer(f, app, theme, rows[2]);
}

fn border_style(app: &App, theme: &Theme, focus: Focus) -> Style {
    if app.focus == focus {
        theme.focused_border_style
    } else {
        theme.border_style
    }
}

fn render_sidebar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, theme, Focus::Sidebar))
        .title(Span::styled("Sessions", theme.title_style))
        .title_bottom(Span::styled("Ctrl+N new", theme.title_style));

    let lines: Vec<Line> = if app.sidebar.loading {
        vec![Line::from(Span::styled(
            "Loading sessions...",
            theme.notice_text_style,
        ))]
    } else {
        app.sidebar
            .sessions
            .iter()
            .enumerate()
            .map(|(index, session)| {
                let is_selected = app.selected_session() == Some(session.id.as_str());
                let marker = if is_selected { "* " } else { "  " };
                let mut style = if is_selected {
                    theme.active_session_style
                } else {
                    Style::default()
                };
                if index == app.sidebar.highlighted && app.focus == Focus::Sidebar {
                    style = style.patch(theme.selection_style);
                }
                Line::from(Span::styled(format!("{marker}{}", session.title), style))
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_top_bar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let cost = app.cost_label();
    let cost_width = u16::try_from(cost.width()).unwrap_or(u16::MAX);
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(cost_width)])
        .split(area);

    let has_attachments = app.composer.has_attachments();
    let mut model_style = if app.models.is_disabled(has_attachments) {
        theme.disabled_style
    } else {
        Style::default()
    };
    if app.focus == Focus::ModelPicker {
        model_style = model_style.patch(theme.selection_style);
    }
    let model_line = Line::from(vec![
        Span::styled("Model: ", theme.title_style),
        Span::styled(app.models.label(has_attachments), model_style),
    ]);

    f.render_widget(Paragraph::new(model_line), parts[0]);
    f.render_widget(
        Paragraph::new(Span::styled(cost, theme.status_style)).alignment(Alignment::Right),
        parts[1],
    );
}

fn render_chat(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = app.sidebar.selected_title().unwrap_or("lanchat").to_string();
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border_style)
        .title(Span::styled(title, theme.title_style));
    let inner = block.inner(area);

    let lines = build_chat_lines(
        &app.chat.entries(),
        theme,
        &LayoutConfig {
            width: inner.width as usize,
            markdown_enabled: app.markdown,
        },
    );

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(inner.height);
    let offset = max_offset.saturating_sub(app.scroll_back.min(max_offset));

    f.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);
}

/// Trailing slice of `input` that fits into `width` columns.
fn visible_tail(input: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (index, ch) in input.char_indices().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        start = index;
    }
    &input[start..]
}

fn render_composer(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, theme, Focus::Composer))
        .title(Span::styled(app.composer.mode.title(), theme.title_style));
    if let Some(status) = &app.status {
        block = block.title_bottom(Span::styled(status.as_str(), theme.status_style));
    }
    let inner = block.inner(area);

    let sending = app.phase == ChatPhase::Sending;
    let input_width = if sending {
        inner.width.saturating_sub(INDICATOR_SPACE)
    } else {
        inner.width
    };
    // Newlines from pastes are shown as spaces on the single input row
    let flattened = app.composer.input().replace('\n', " ");
    let visible = visible_tail(&flattened, input_width as usize);

    let mut lines = Vec::new();
    if app.composer.has_attachments() {
        let mut chips = Vec::new();
        for attachment in &app.composer.attachments {
            let style = if attachment.error {
                theme.failed_chip_style
            } else {
                theme.chip_style
            };
            chips.push(Span::styled(format!(" {} ", attachment.chip_label()), style));
            chips.push(Span::raw(" "));
        }
        lines.push(Line::from(chips));
    }
    let input_row = lines.len() as u16;
    let mut input_spans = vec![Span::raw(visible.to_string())];
    if sending {
        let padding = input_width.saturating_sub(visible.width() as u16) as usize + 1;
        input_spans.push(Span::raw(" ".repeat(padding)));
        input_spans.push(Span::styled("●", theme.streaming_indicator_style));
    }
    lines.push(Line::from(input_spans));

    f.render_widget(Paragraph::new(lines).block(block), area);

    if app.focus == Focus::Composer && inner.height > input_row {
        let cursor_x = inner.x + (visible.width() as u16).min(input_width);
        f.set_cursor_position((cursor_x, inner.y + input_row));
    }
}
