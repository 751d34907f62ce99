use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub notice_text_style: Style,
    pub error_text_style: Style,

    // Markdown
    pub heading_style: Style,
    pub inline_code_style: Style,
    pub code_block_style: Style,
    pub blockquote_style: Style,
    pub link_style: Style,
    pub math_style: Style,
    pub list_marker_style: Style,
    pub table_border_style: Style,

    // Chrome
    pub title_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,
    pub selection_style: Style,
    pub active_session_style: Style,
    pub disabled_style: Style,
    pub chip_style: Style,
    pub failed_chip_style: Style,
    pub status_style: Style,
    pub streaming_indicator_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            notice_text_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            error_text_style: Style::default().fg(Color::LightRed),

            heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            inline_code_style: Style::default().fg(Color::Yellow),
            code_block_style: Style::default().fg(Color::Yellow),
            blockquote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            math_style: Style::default().fg(Color::LightMagenta),
            list_marker_style: Style::default().fg(Color::Gray),
            table_border_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::Gray),
            border_style: Style::default().fg(Color::DarkGray),
            focused_border_style: Style::default().fg(Color::Cyan),
            selection_style: Style::default().add_modifier(Modifier::REVERSED),
            active_session_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            disabled_style: Style::default().fg(Color::DarkGray),
            chip_style: Style::default().fg(Color::Black).bg(Color::Gray),
            failed_chip_style: Style::default().fg(Color::White).bg(Color::Red),
            status_style: Style::default().fg(Color::Yellow),
            streaming_indicator_style: Style::default().fg(Color::White),
        }
    }

    pub fn heading(&self, level: u8) -> Style {
        match level {
            1 => self.heading_style.add_modifier(Modifier::UNDERLINED),
            _ => self.heading_style,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}
