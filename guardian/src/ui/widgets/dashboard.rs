//! KSDMA control center dashboard

use guardian_core::language::Strings;
use guardian_core::Dashboard;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Sparkline, Widget, Wrap},
};

use crate::ui::theme::GuardianTheme;

pub struct DashboardWidget<'a> {
    dashboard: &'a Dashboard,
    strings: &'a Strings,
    theme: &'a GuardianTheme,
    node_cursor: usize,
}

impl<'a> DashboardWidget<'a> {
    pub fn new(dashboard: &'a Dashboard, strings: &'a Strings, theme: &'a GuardianTheme) -> Self {
        Self {
            dashboard,
            strings,
            theme,
            node_cursor: 0,
        }
    }

    pub fn node_cursor(mut self, cursor: usize) -> Self {
        self.node_cursor = cursor;
        self
    }

    fn panel(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(self.theme.title_style(false))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false))
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let view = self.dashboard.view();
        let lines = vec![
            Line::from(vec![
                Span::styled(self.strings.dashboard_title, self.theme.heading_style()),
                Span::raw(" · "),
                Span::styled(view.bundle.name, self.theme.text_style()),
                Span::styled(format!("  {}", self.dashboard.clock()), self.theme.system_style()),
            ]),
            Line::from(Span::styled(self.strings.dashboard_subtitle, self.theme.system_style())),
        ];
        Paragraph::new(lines).render(area, buf);
    }

    fn render_metrics(&self, area: Rect, buf: &mut Buffer) {
        let view = self.dashboard.view();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for ((metric, value), column) in view.bundle.metrics.iter().zip(view.live_values).zip(columns.iter()) {
            let (glyph, glyph_style) = self.theme.trend_glyph(metric.trend);
            let title = Line::from(vec![
                Span::styled(format!(" {} ", metric.label), self.theme.title_style(metric.critical)),
                Span::styled(format!("{glyph} "), glyph_style),
            ]);
            let ratio = if metric.max > 0.0 { (value / metric.max).clamp(0.0, 1.0) } else { 0.0 };

            Gauge::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(self.theme.border_style(metric.critical)),
                )
                .gauge_style(Style::default().fg(self.theme.level_color(ratio)))
                .ratio(ratio)
                .label(format!("{value:.1} {}", metric.unit))
                .render(*column, buf);
        }
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        let data: Vec<u64> = self.dashboard.chart().iter().map(|v| u64::from(*v)).collect();
        Sparkline::default()
            .block(self.panel(self.strings.active_units))
            .data(&data)
            .max(100)
            .style(Style::default().fg(self.theme.accent))
            .render(area, buf);
    }

    fn render_nodes(&self, area: Rect, buf: &mut Buffer) {
        let view = self.dashboard.view();
        let items: Vec<ListItem> = view
            .bundle
            .risk_nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let selected = view.selected_node == Some(node.name);
                let cursor = if i == self.node_cursor { "▸ " } else { "  " };
                let mut spans = vec![
                    Span::styled(cursor, self.theme.heading_style()),
                    Span::styled("● ", Style::default().fg(self.theme.risk_color(node.level))),
                    Span::styled(node.name, self.theme.title_style(selected)),
                    Span::styled(format!(" {}", node.level.label()), self.theme.system_style()),
                ];
                if selected {
                    spans.push(Span::styled(
                        format!("  pop {} · {:.4}, {:.4}", node.population, node.lat, node.lng),
                        self.theme.text_style(),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        List::new(items)
            .block(self.panel(self.strings.network_nodes))
            .render(area, buf);
    }

    fn render_alerts(&self, area: Rect, buf: &mut Buffer) {
        let view = self.dashboard.view();
        let lines: Vec<Line> = view
            .bundle
            .alerts
            .iter()
            .flat_map(|alert| {
                [
                    Line::from(Span::styled(
                        alert.message,
                        Style::default()
                            .fg(self.theme.alert_color(alert.kind))
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(alert.time, self.theme.system_style())),
                ]
            })
            .collect();

        Paragraph::new(lines)
            .block(self.panel(self.strings.active_alerts))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl Widget for DashboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title and clock
                Constraint::Length(3), // Metric gauges
                Constraint::Min(6),    // Chart and alerts
                Constraint::Length(6), // Risk nodes
            ])
            .split(area);

        self.render_header(rows[0], buf);
        self.render_metrics(rows[1], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        self.render_chart(middle[0], buf);
        self.render_alerts(middle[1], buf);

        self.render_nodes(rows[3], buf);
    }
}
