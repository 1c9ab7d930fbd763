//! Input line widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GuardianTheme;

/// Single-line text input with a block cursor
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a GuardianTheme,
    title: &'a str,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a GuardianTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            title: "",
            placeholder: "Type a message...",
            is_active: true,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));
        if !self.title.is_empty() {
            block = block
                .title(format!(" {} ", self.title))
                .title_style(self.theme.title_style(self.is_active));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.content.is_empty() && !self.is_active {
            Line::from(vec![
                Span::styled("> ", self.theme.user_style()),
                Span::styled(self.placeholder, Style::default().add_modifier(Modifier::DIM)),
            ])
        } else {
            // Character-based slicing keeps Malayalam and Devanagari input intact
            let before_cursor: String = self.content.chars().take(self.cursor_position).collect();
            let at_cursor = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after_cursor: String = self.content.chars().skip(self.cursor_position + 1).collect();

            let cursor_style = if self.is_active {
                Style::default()
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                    .fg(self.theme.user_text)
            } else {
                Style::default()
            };

            Line::from(vec![
                Span::styled("> ", self.theme.user_style()),
                Span::raw(before_cursor),
                Span::styled(at_cursor, cursor_style),
                Span::raw(after_cursor),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
