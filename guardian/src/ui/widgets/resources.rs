//! Resource overview cards

use guardian_core::{ResourceOverview, RESOURCE_CATEGORIES};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::ui::theme::GuardianTheme;

/// Four category cards in a 2x2 grid
pub struct ResourcesWidget<'a> {
    overview: &'a ResourceOverview,
    theme: &'a GuardianTheme,
    cursor: usize,
}

impl<'a> ResourcesWidget<'a> {
    pub fn new(overview: &'a ResourceOverview, theme: &'a GuardianTheme) -> Self {
        Self {
            overview,
            theme,
            cursor: 0,
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    fn render_card(&self, index: usize, area: Rect, buf: &mut Buffer) {
        let Some(category) = RESOURCE_CATEGORIES.get(index) else {
            return;
        };
        let focused = index == self.cursor;
        let expanded = self.overview.expanded() == Some(index);
        let chevron = if expanded { "▾" } else { "▸" };

        let block = Block::default()
            .title(format!(" {} {} {chevron} ", category.kind.glyph(), category.title))
            .title_style(self.theme.title_style(focused))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Description
                Constraint::Length(1), // Counter
                Constraint::Min(0),    // Breakdown
            ])
            .split(inner);

        Paragraph::new(Span::styled(category.description, self.theme.system_style()))
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        let count = self.overview.count(index);
        let ratio = if category.count > 0 {
            f64::from(count) / f64::from(category.count)
        } else {
            0.0
        };
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.accent))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{count} {} ✔ Verified", category.unit.to_uppercase()))
            .render(chunks[1], buf);

        if expanded {
            let mut lines = vec![Line::from(Span::styled(
                "ASSET BREAKDOWN",
                self.theme.system_style().add_modifier(Modifier::UNDERLINED),
            ))];
            lines.extend(category.details.iter().map(|detail| {
                Line::from(vec![
                    Span::styled("✔ ", Style::default().fg(self.theme.online)),
                    Span::styled(*detail, self.theme.text_style()),
                ])
            }));
            Paragraph::new(lines).render(chunks[2], buf);
        }
    }
}

impl Widget for ResourcesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(area);

        Paragraph::new(Line::from(vec![
            Span::styled("Map What Matters", self.theme.heading_style()),
            Span::styled(
                "  high-impact assets for the first 48 hours of a landslide",
                self.theme.system_style(),
            ),
        ]))
        .render(rows[0], buf);

        for (row, area) in rows[1..].iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2); 2])
                .split(*area);
            for (column, cell) in columns.iter().enumerate() {
                self.render_card(row * 2 + column, *cell, buf);
            }
        }
    }
}
