//! Live map of the Wayanad landslide scenario, with the tactical briefing
//! under the canvas while the scenario runs

use guardian_core::assets::WAYANAD_CENTER;
use guardian_core::language::Strings;
use guardian_core::{LandslidePhase, LandslideSimulation, Readiness, ASSETS, RISK_ZONES, STRIKE_ZONES};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Gauge, Paragraph, Widget, Wrap,
    },
};

use crate::ui::layout::split_sidebar;
use crate::ui::theme::GuardianTheme;

const LNG_BOUNDS: [f64; 2] = [76.100, 76.160];
const LAT_BOUNDS: [f64; 2] = [11.660, 11.710];
const METERS_PER_DEGREE: f64 = 111_000.0;
const BRIEFING_HEIGHT: u16 = 12;

/// Map canvas plus a deployment sidebar
pub struct MapWidget<'a> {
    sim: &'a LandslideSimulation,
    strings: &'a Strings,
    theme: &'a GuardianTheme,
}

impl<'a> MapWidget<'a> {
    pub fn new(sim: &'a LandslideSimulation, strings: &'a Strings, theme: &'a GuardianTheme) -> Self {
        Self { sim, strings, theme }
    }

    fn render_canvas(&self, area: Rect, buf: &mut Buffer) {
        let sim = self.sim;
        let theme = self.theme;
        let path = sim.link_path();

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .title(format!(" {} ", self.strings.view_map))
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(true)),
            )
            .marker(Marker::Braille)
            .x_bounds(LNG_BOUNDS)
            .y_bounds(LAT_BOUNDS)
            .paint(move |ctx| {
                if sim.show_heat_layer() {
                    for zone in RISK_ZONES {
                        ctx.draw(&Circle {
                            x: zone.center.lng,
                            y: zone.center.lat,
                            radius: zone.radius_m as f64 / METERS_PER_DEGREE,
                            color: theme.risk_color(zone.level),
                        });
                    }
                }
                ctx.layer();

                for pair in path.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].lng,
                        y1: pair[0].lat,
                        x2: pair[1].lng,
                        y2: pair[1].lat,
                        color: theme.mesh,
                    });
                }
                ctx.layer();

                if sim.is_triggered() {
                    ctx.print(
                        WAYANAD_CENTER.lng,
                        WAYANAD_CENTER.lat,
                        Span::styled("✖", Style::default().fg(theme.critical).add_modifier(Modifier::BOLD)),
                    );
                }

                let selected = sim.selected_asset().map(|a| a.id);
                for asset in ASSETS {
                    let style = if selected == Some(asset.id) {
                        Style::default().fg(theme.border_focused).add_modifier(Modifier::REVERSED)
                    } else if sim.is_active(asset.id) {
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                    } else {
                        theme.system_style()
                    };
                    ctx.print(
                        asset.location.lng,
                        asset.location.lat,
                        Line::from(Span::styled(asset.category.glyph(), style)),
                    );
                }
            });

        canvas.render(area, buf);
    }

    fn render_briefing(&self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let block = Block::default()
            .title(format!(" {} [b] ", self.strings.briefing_hide))
            .borders(Borders::ALL)
            .border_style(theme.border_style(false));

        let selected = self.sim.selected_zone().map(|z| z.id);
        let mut lines = Vec::new();
        for zone in STRIKE_ZONES {
            let is_selected = selected == Some(zone.id);
            let name_style = if is_selected {
                theme.heading_style().add_modifier(Modifier::REVERSED)
            } else {
                theme.system_style()
            };
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(theme.zone_color(zone.color))),
                Span::styled(zone.name, name_style),
                Span::raw(" "),
                Span::styled(zone.area, theme.text_style().add_modifier(Modifier::BOLD)),
                Span::styled(format!(" · {}", zone.task), Style::default().fg(theme.accent)),
            ]));
            if is_selected {
                lines.push(Line::from(vec![
                    Span::styled("  PROTOCOL: ", theme.heading_style()),
                    Span::styled(zone.protocol, theme.text_style()),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("  Gear: {}", zone.gear),
                    theme.system_style().add_modifier(Modifier::ITALIC),
                )));
            }
        }
        if selected.is_none() {
            lines.push(Line::from(Span::styled(
                "Press z for deployment protocol...",
                theme.system_style().add_modifier(Modifier::ITALIC),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_sidebar(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.strings.deployment_status))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Phase and network
                Constraint::Length(1), // Scan gauge
                Constraint::Min(4),    // Asset list
                Constraint::Length(4), // Selection detail
            ])
            .split(inner);

        let sim = self.sim;
        let header = vec![
            Line::from(Span::styled(
                sim.phase().label(),
                self.theme.heading_style(),
            )),
            Line::from(vec![
                Span::raw("Network: "),
                Span::styled(sim.network().label(), self.theme.network_style(sim.network())),
            ]),
        ];
        Paragraph::new(header).render(chunks[0], buf);

        let scan_label = if sim.is_scanning() {
            format!("Scanning {}%", sim.scan_progress())
        } else {
            format!("Scan {}%", sim.scan_progress())
        };
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.accent))
            .ratio(f64::from(sim.scan_progress()) / 100.0)
            .label(scan_label)
            .render(chunks[1], buf);

        let mut lines = vec![Line::from(Span::styled(
            format!("{}/{} assets deployed", sim.deployed_count(), sim.total_assets()),
            self.theme.text_style(),
        ))];
        if sim.phase() != LandslidePhase::Idle {
            lines.push(Line::from(Span::styled(
                format!("{} Wayanad {}", self.strings.detected, self.strings.sector),
                Style::default().fg(self.theme.critical),
            )));
            if !sim.briefing_visible() {
                lines.push(Line::from(Span::styled(
                    format!("[b] {}", self.strings.briefing_show),
                    self.theme.system_style(),
                )));
            }
        }
        for asset in sim.active_assets() {
            let readiness = match asset.readiness {
                Readiness::Standby => "standby",
                Readiness::Deployed => "deployed",
                Readiness::EnRoute => "en route",
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", asset.category.glyph())),
                Span::styled(asset.short_name(), self.theme.text_style()),
                Span::styled(format!(" {readiness}"), self.theme.system_style()),
            ]));
        }
        if sim.skill_deficit() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "⚠ SKILL DEFICIT DETECTED",
                Style::default().fg(self.theme.moderate).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                "No additional excavators found in zone. Auto-alerting Kalpetta Heavy Machinery Union...",
                Style::default().fg(self.theme.moderate),
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        if let Some(asset) = sim.selected_asset() {
            let mut detail = vec![
                Line::from(Span::styled(asset.name, self.theme.heading_style())),
                Line::from(format!("{} · {}", asset.category.label(), asset.task)),
            ];
            let mut status = Vec::new();
            if let Some(eta) = asset.eta {
                status.push(Span::raw(format!("ETA {eta} ")));
            }
            if asset.verified {
                status.push(Span::styled("✔ verified", Style::default().fg(self.theme.online)));
            }
            detail.push(Line::from(status));
            Paragraph::new(detail)
                .wrap(Wrap { trim: true })
                .render(chunks[3], buf);
        }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (map_area, sidebar) = split_sidebar(area, 65);
        if self.sim.briefing_visible() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(BRIEFING_HEIGHT)])
                .split(map_area);
            self.render_canvas(chunks[0], buf);
            self.render_briefing(chunks[1], buf);
        } else {
            self.render_canvas(map_area, buf);
        }
        self.render_sidebar(sidebar, buf);
    }
}
