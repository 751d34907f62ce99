//! Markdown to styled terminal lines.
//!
//! Rendering is a pure function of the message text, so the streaming
//! placeholder is simply re-rendered from its full accumulated content on
//! every fragment.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

pub fn render_plain(content: &str, base: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| Line::from(Span::styled(detab(line), base)))
        .collect()
}

pub fn render_markdown(content: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, base).render(content)
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Vec<String>>,
    header_rows: usize,
    current_row: Vec<String>,
    current_cell: String,
}

impl TableBuilder {
    fn end_cell(&mut self) {
        let cell = std::mem::take(&mut self.current_cell);
        self.current_row.push(cell.trim().to_string());
    }

    fn end_row(&mut self) {
        let row = std::mem::take(&mut self.current_row);
        self.rows.push(row);
    }

    fn end_header(&mut self) {
        // The header's cells arrive without an enclosing row.
        if !self.current_row.is_empty() {
            self.end_row();
        }
        self.header_rows = self.rows.len();
    }

    fn finalize(self, theme: &Theme, base: Style) -> Vec<Line<'static>> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Vec::new();
        }
        let mut widths = vec![1usize; columns];
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                widths[index] = widths[index].max(cell.width());
            }
        }

        let border = theme.table_border_style;
        let rule = |left: &str, mid: &str, right: &str| {
            let body = widths
                .iter()
                .map(|width| "─".repeat(width + 2))
                .collect::<Vec<_>>()
                .join(mid);
            Line::from(Span::styled(format!("{left}{body}{right}"), border))
        };

        let mut lines = vec![rule("┌", "┬", "┐")];
        for (row_index, row) in self.rows.iter().enumerate() {
            let mut spans = vec![Span::styled("│", border)];
            for (index, width) in widths.iter().enumerate() {
                let cell = row.get(index).map(String::as_str).unwrap_or("");
                let padding = width.saturating_sub(cell.width());
                let style = if row_index < self.header_rows {
                    base.add_modifier(Modifier::BOLD)
                } else {
                    base
                };
                spans.push(Span::styled(
                    format!(" {cell}{} ", " ".repeat(padding)),
                    style,
                ));
                spans.push(Span::styled("│", border));
            }
            lines.push(Line::from(spans));
            if row_index + 1 == self.header_rows && self.rows.len() > self.header_rows {
                lines.push(rule("├", "┼", "┤"));
            }
        }
        lines.push(rule("└", "┴", "┘"));
        lines
    }
}

struct MarkdownRenderer<'a> {
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<Option<u64>>,
    quote_depth: usize,
    code_block: Option<String>,
    table: Option<TableBuilder>,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(theme: &'a Theme, base: Style) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![base],
            list_stack: Vec::new(),
            quote_depth: 0,
            code_block: None,
            table: None,
        }
    }

    fn base(&self) -> Style {
        self.style_stack[0]
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(table) = self.table.as_mut() {
            table.current_cell.push_str(text);
            return;
        }
        self.spans.push(Span::styled(detab(text), style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                self.theme.blockquote_style,
            ));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn push_blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            return;
        }
        if !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
    }

    fn list_marker(&mut self) -> String {
        let depth = self.list_stack.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        match self.list_stack.last_mut() {
            Some(Some(number)) => {
                let current = *number;
                *number += 1;
                format!("{indent}{current}. ")
            }
            _ => format!("{indent}- "),
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_MATH);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if let Some(code) = self.code_block.as_mut() {
                        code.push_str(&text);
                    } else {
                        let style = self.current_style();
                        self.push_text(&text, style);
                    }
                }
                Event::Code(code) => {
                    let style = self.theme.inline_code_style;
                    self.push_text(&code, style);
                }
                Event::InlineMath(math) => {
                    let style = self.theme.math_style;
                    self.push_text(&format!("${math}$"), style);
                }
                Event::DisplayMath(math) => {
                    self.flush();
                    let style = self.theme.math_style;
                    self.push_text(&format!("$${math}$$"), style);
                    self.flush();
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(table) = self.table.as_mut() {
                        table.current_cell.push(' ');
                    } else {
                        self.flush();
                    }
                }
                Event::Rule => {
                    self.flush();
                    self.lines.push(Line::from(Span::styled(
                        "─".repeat(24),
                        self.theme.table_border_style,
                    )));
                    self.push_blank();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    let style = self.theme.list_marker_style;
                    self.push_text(marker, style);
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.current_style();
                    self.push_text(html.trim_end_matches('\n'), style);
                }
                Event::FootnoteReference(_) => {}
            }
        }
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let style = self.theme.heading(heading_level(level));
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                self.style_stack.push(self.theme.blockquote_style);
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = self.list_marker();
                let style = self.theme.list_marker_style;
                self.push_text(&marker, style);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.code_block = Some(String::new());
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { .. } | Tag::Image { .. } => {
                self.style_stack.push(self.theme.link_style);
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuilder::default());
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.push_blank();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    for line in code.lines() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {}", detab(line)),
                            self.theme.code_block_style,
                        )));
                    }
                }
                self.push_blank();
            }
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => self.pop_style(),
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_header();
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    let base = self.base();
                    let lines = table.finalize(self.theme, base);
                    self.lines.extend(lines);
                    self.push_blank();
                }
            }
            _ => {}
        }
    }
}
