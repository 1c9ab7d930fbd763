//! Assistant chat transcript widget

use chrono::Local;
use guardian_core::assistant::{render_markup, Conversation, MarkupLine, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget, Wrap},
};

use crate::ui::theme::GuardianTheme;

const CHIP_KEYS: [char; 3] = ['a', 'b', 'c'];

/// Chat transcript with typing indicator and quick-reply chips
pub struct ChatWidget<'a> {
    conversation: &'a Conversation,
    theme: &'a GuardianTheme,
    scroll_back: usize,
    focused: bool,
}

impl<'a> ChatWidget<'a> {
    pub fn new(conversation: &'a Conversation, theme: &'a GuardianTheme) -> Self {
        Self {
            conversation,
            theme,
            scroll_back: 0,
            focused: false,
        }
    }

    /// Lines scrolled up from the bottom.
    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn reply_lines(&self, text: &str) -> Vec<Line<'static>> {
        let base = self.theme.assistant_style();
        render_markup(text)
            .into_iter()
            .map(|line| match line {
                MarkupLine::BarChart(s) => {
                    Line::from(Span::styled(s, Style::default().fg(self.theme.bar_chart)))
                }
                MarkupLine::Heading(s) => Line::from(Span::styled(s, self.theme.heading_style())),
                MarkupLine::Rich(spans) => Line::from(
                    spans
                        .into_iter()
                        .map(|span| {
                            let style = if span.bold {
                                base.add_modifier(Modifier::BOLD)
                            } else {
                                base
                            };
                            Span::styled(span.text, style)
                        })
                        .collect::<Vec<_>>(),
                ),
                MarkupLine::Blank => Line::from(""),
                MarkupLine::Plain(s) => Line::from(Span::styled(s, base)),
            })
            .collect()
    }

    fn transcript_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for turn in self.conversation.turns() {
            let stamp = turn.timestamp.with_timezone(&Local).format("%H:%M").to_string();
            match turn.role {
                Role::User => {
                    lines.push(Line::from(vec![
                        Span::styled(format!("You {stamp}"), self.theme.system_style()),
                    ]));
                    for text in turn.text.lines() {
                        lines.push(Line::from(Span::styled(format!("> {text}"), self.theme.user_style())));
                    }
                }
                Role::Assistant => {
                    lines.push(Line::from(vec![
                        Span::styled("GuardianNet AI ", self.theme.heading_style()),
                        Span::styled(stamp, self.theme.system_style()),
                    ]));
                    lines.extend(self.reply_lines(&turn.text));
                }
            }
            lines.push(Line::from(""));
        }

        if self.conversation.is_typing() {
            lines.push(Line::from(Span::styled(
                "GuardianNet AI is typing...",
                self.theme.system_style().add_modifier(Modifier::ITALIC),
            )));
        }

        lines
    }

    fn chip_line(&self) -> Option<Line<'static>> {
        let chips = self.conversation.quick_suggestions();
        if chips.is_empty() {
            return None;
        }
        let mut spans = vec![Span::styled("Try: ", self.theme.system_style())];
        for (key, chip) in CHIP_KEYS.iter().zip(chips) {
            spans.push(Span::styled(format!("[{key}] "), self.theme.heading_style()));
            spans.push(Span::styled(format!("{chip}  "), self.theme.text_style()));
        }
        Some(Line::from(spans))
    }
}

impl Widget for ChatWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " GuardianNet AI [j/k scroll] "
        } else {
            " GuardianNet AI "
        };
        let block = Block::default()
            .title(title)
            .title_style(self.theme.title_style(self.focused))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if !self.conversation.is_open() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Chat is closed.", self.theme.system_style())),
                Line::from(Span::styled("Press i to start typing.", self.theme.system_style())),
            ]);
            hint.render(inner, buf);
            return;
        }

        // Reserve the bottom row for quick replies
        let chips = self.chip_line();
        let (body, chip_row) = match chips {
            Some(_) if inner.height > 2 => (
                Rect { height: inner.height - 1, ..inner },
                Some(Rect { y: inner.y + inner.height - 1, height: 1, ..inner }),
            ),
            _ => (inner, None),
        };
        if let (Some(line), Some(row)) = (chips, chip_row) {
            Paragraph::new(line).render(row, buf);
        }

        let lines = self.transcript_lines();
        let visible_height = body.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = max_scroll.saturating_sub(self.scroll_back);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(body, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: body.x + body.width.saturating_sub(1),
                width: 1,
                ..body
            };
            let mut state = ScrollbarState::new(max_scroll).position(scroll);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(self.theme.border))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(scrollbar_area, buf, &mut state);
        }
    }
}
