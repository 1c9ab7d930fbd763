//! Volunteer verification portal widget

use guardian_core::registry::skill_by_id;
use guardian_core::{VerificationFlow, VerificationStep};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::app::FormField;
use crate::ui::theme::GuardianTheme;

pub struct VerificationWidget<'a> {
    flow: &'a VerificationFlow,
    theme: &'a GuardianTheme,
    focused_field: FormField,
    editing: bool,
}

impl<'a> VerificationWidget<'a> {
    pub fn new(flow: &'a VerificationFlow, theme: &'a GuardianTheme) -> Self {
        Self {
            flow,
            theme,
            focused_field: FormField::default(),
            editing: false,
        }
    }

    pub fn focused_field(mut self, field: FormField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    fn field_line(&self, field: FormField, value: &str) -> Line<'static> {
        let focused = field == self.focused_field;
        let marker = if focused { "▸ " } else { "  " };
        let value_style = if focused && self.editing {
            self.theme.user_style()
        } else {
            self.theme.text_style()
        };
        let shown = if value.is_empty() { "·····".to_string() } else { value.to_string() };
        Line::from(vec![
            Span::styled(marker, self.theme.heading_style()),
            Span::styled(format!("{:<14}", field.label()), self.theme.title_style(focused)),
            Span::styled(shown, value_style),
        ])
    }

    fn form_lines(&self) -> Vec<Line<'static>> {
        let form = self.flow.form();
        let skill = skill_by_id(form.skill);
        let skill_text = skill
            .map(|s| format!("{} {} ({})", s.icon, s.label, s.org))
            .unwrap_or_else(|| form.skill.to_string());

        vec![
            Line::from(Span::styled("Verify your credentials", self.theme.heading_style())),
            Line::from(Span::styled(
                "Checked against the Kerala State responder registry",
                self.theme.system_style(),
            )),
            Line::from(""),
            self.field_line(FormField::FullName, &form.full_name),
            self.field_line(FormField::Mobile, &form.mobile),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{:<14}", "Skill"), self.theme.title_style(false)),
                Span::styled(skill_text, self.theme.text_style()),
                Span::styled("  [s] change", self.theme.system_style()),
            ]),
            self.field_line(FormField::IdNumber, &form.id_number),
            Line::from(""),
            Line::from(Span::styled(
                if form.is_complete() {
                    "Press Enter to verify"
                } else {
                    "Fill in every field to verify"
                },
                self.theme.system_style(),
            )),
        ]
    }

    fn render_progress(&self, area: Rect, buf: &mut Buffer) {
        let step = self.flow.step();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        Paragraph::new(Line::from(Span::styled(
            step.status_message(),
            self.theme.heading_style(),
        )))
        .render(chunks[0], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.accent))
            .percent(u16::from(step.progress_percent()))
            .render(chunks[1], buf);
    }

    fn result_lines(&self) -> Vec<Line<'static>> {
        match self.flow.step() {
            VerificationStep::Verified(entry) => vec![
                Line::from(Span::styled(
                    "✔ VERIFIED RESPONDER",
                    Style::default().fg(self.theme.online).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(entry.name.clone(), self.theme.heading_style())),
                Line::from(format!("ID        {}", entry.id)),
                Line::from(format!("Skill     {}", entry.skill)),
                Line::from(format!("Org       {}", entry.org)),
                Line::from(format!("District  {}", entry.district)),
                Line::from(""),
                Line::from(Span::styled(
                    "You are now visible to KSDMA dispatch. Press x to close.",
                    self.theme.system_style(),
                )),
            ],
            _ => vec![
                Line::from(Span::styled(
                    "✖ NOT FOUND IN REGISTRY",
                    Style::default().fg(self.theme.critical).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("We could not match that name and license number."),
                Line::from(Span::styled(
                    "Press r to edit and retry, x to close.",
                    self.theme.system_style(),
                )),
            ],
        }
    }
}

impl Widget for VerificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Volunteer Verification ")
            .title_style(self.theme.title_style(true))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.flow.step() {
            VerificationStep::Form => {
                Paragraph::new(self.form_lines())
                    .wrap(Wrap { trim: false })
                    .render(inner, buf);
            }
            VerificationStep::Connecting | VerificationStep::Validating => {
                self.render_progress(inner, buf);
            }
            VerificationStep::Verified(_) | VerificationStep::NotFound => {
                Paragraph::new(self.result_lines())
                    .wrap(Wrap { trim: false })
                    .render(inner, buf);
            }
        }
    }
}
