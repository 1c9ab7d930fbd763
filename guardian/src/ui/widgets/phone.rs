//! Simulated volunteer phone

use guardian_core::language::Strings;
use guardian_core::{VolunteerPhase, VolunteerSimulator};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::layout::centered_rect_fixed;
use crate::ui::theme::GuardianTheme;

const PHONE_WIDTH: u16 = 40;
const PHONE_HEIGHT: u16 = 22;

pub struct PhoneWidget<'a> {
    sim: &'a VolunteerSimulator,
    strings: &'a Strings,
    theme: &'a GuardianTheme,
    clock: &'a str,
}

impl<'a> PhoneWidget<'a> {
    pub fn new(sim: &'a VolunteerSimulator, strings: &'a Strings, theme: &'a GuardianTheme) -> Self {
        Self {
            sim,
            strings,
            theme,
            clock: "",
        }
    }

    pub fn clock(mut self, clock: &'a str) -> Self {
        self.clock = clock;
        self
    }

    fn screen_lines(&self) -> Vec<Line<'static>> {
        let mission = self.sim.mission();
        let alert = Style::default().fg(self.theme.critical).add_modifier(Modifier::BOLD);

        match self.sim.phase() {
            VolunteerPhase::Standby => vec![
                Line::from(""),
                Line::from(Span::styled("GuardianNet", self.theme.heading_style())).centered(),
                Line::from(Span::styled("Volunteer on standby", self.theme.system_style())).centered(),
                Line::from(""),
                Line::from("No active missions").centered(),
            ],
            VolunteerPhase::Alerting => vec![
                Line::from(""),
                Line::from(Span::styled("⚠ EMERGENCY ALERT ⚠", alert)).centered(),
                Line::from(""),
                Line::from(format!("{} Wayanad", self.strings.detected)).centered(),
                Line::from(Span::styled("Matching your skills...", self.theme.system_style())).centered(),
            ],
            VolunteerPhase::MissionOffered => vec![
                Line::from(Span::styled("MISSION REQUEST", alert)).centered(),
                Line::from(""),
                Line::from(Span::styled(mission.location, self.theme.heading_style())),
                Line::from(mission.task),
                Line::from(mission.equipment),
                Line::from(format!("👥 {}", mission.victims)),
                Line::from(format!("📍 {} away", mission.distance)),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[a] ACCEPT", Style::default().fg(self.theme.online).add_modifier(Modifier::BOLD)),
                    Span::raw("   "),
                    Span::styled("[r] REJECT", Style::default().fg(self.theme.critical)),
                ])
                .centered(),
            ],
            VolunteerPhase::Accepted => vec![
                Line::from(Span::styled(
                    format!("✔ {}", self.strings.mission_accepted),
                    Style::default().fg(self.theme.online).add_modifier(Modifier::BOLD),
                ))
                .centered(),
                Line::from(""),
                Line::from(Span::styled(self.strings.mission_target, self.theme.system_style())),
                Line::from(mission.location),
                Line::from(format!(
                    "({:.4}, {:.4})",
                    mission.coordinates.lat, mission.coordinates.lng
                )),
                Line::from(Span::styled(self.strings.mission_distance, self.theme.system_style())),
                Line::from(mission.distance),
                Line::from(Span::styled(self.strings.mission_victims, self.theme.system_style())),
                Line::from(mission.victims),
                Line::from(""),
                Line::from(Span::styled("Navigation started", self.theme.heading_style())).centered(),
            ],
        }
    }
}

impl Widget for PhoneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.sim.is_open() {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(self.strings.open_interface, self.theme.heading_style())).centered(),
                Line::from(Span::styled("Press o to open", self.theme.system_style())).centered(),
            ];
            Paragraph::new(lines).render(area, buf);
            return;
        }

        let phone = centered_rect_fixed(PHONE_WIDTH, PHONE_HEIGHT, area);
        let battery = self.sim.battery();
        let battery_style = Style::default().fg(self.theme.level_color(1.0 - f64::from(battery) / 100.0));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_style(true))
            .title(Line::from(Span::styled(format!(" {} ", self.clock), self.theme.text_style())))
            .title(Line::from(Span::styled(format!(" 🔋{battery}% "), battery_style)).right_aligned())
            .title_bottom(Line::from(Span::styled(
                format!(" [x] {} ", self.strings.exit_interface),
                self.theme.system_style(),
            )).centered());

        Paragraph::new(self.screen_lines())
            .block(block)
            .wrap(Wrap { trim: true })
            .render(phone, buf);
    }
}
