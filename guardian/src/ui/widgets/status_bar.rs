//! Status and hotkey bars

use guardian_core::{Language, NetworkMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::{InputMode, View};
use crate::ui::theme::GuardianTheme;

/// One-line status: input mode, network, language and the latest message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    network: NetworkMode,
    language: Language,
    message: Option<&'a str>,
    theme: &'a GuardianTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, network: NetworkMode, language: Language, theme: &'a GuardianTheme) -> Self {
        Self {
            input_mode,
            network,
            language,
            message: None,
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (mode, mode_bg) = match self.input_mode {
            InputMode::Normal => (" NORMAL ", Color::Blue),
            InputMode::Insert => (" INSERT ", Color::Green),
        };

        let mut spans = vec![
            Span::styled(
                mode,
                Style::default()
                    .fg(Color::Black)
                    .bg(mode_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.network.label(), self.theme.network_style(self.network)),
            Span::raw(" | "),
            Span::styled(
                format!("{} {}", self.language.code(), self.language.native_name()),
                self.theme.text_style(),
            ),
        ];

        if let Some(message) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message.to_string(), self.theme.system_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Context-sensitive key hints
pub struct HotkeyBarWidget<'a> {
    view: View,
    input_mode: InputMode,
    theme: &'a GuardianTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(view: View, input_mode: InputMode, theme: &'a GuardianTheme) -> Self {
        Self {
            view,
            input_mode,
            theme,
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.input_mode == InputMode::Insert {
            return match self.view {
                View::Verification => &[("Enter", "next field"), ("Tab", "switch field"), ("Esc", "done")],
                _ => &[("Enter", "send"), ("Esc", "cancel")],
            };
        }
        match self.view {
            View::Map => &[("t", "trigger"), ("r", "reset"), ("h", "heat layer"), ("j/k", "assets"), ("b", "briefing"), ("z", "zone"), ("Tab", "view"), ("?", "help"), ("q", "quit")],
            View::Assistant => &[("i", "type"), ("a/b/c", "suggestion"), ("j/k", "scroll"), ("x", "close chat"), ("Tab", "view"), ("?", "help")],
            View::Verification => &[("i", "edit"), ("Tab", "field"), ("s", "skill"), ("Enter", "verify"), ("r", "retry"), ("x", "close"), ("?", "help")],
            View::Volunteer => &[("o", "open"), ("a", "accept"), ("r", "reject"), ("x", "exit"), ("Tab", "view"), ("?", "help")],
            View::Dashboard => &[("n", "region"), ("j/k", "nodes"), ("Enter", "select"), ("Tab", "view"), ("l", "lang"), ("?", "help")],
            View::Resources => &[("j/k", "cards"), ("Enter", "details"), ("Tab", "view"), ("l", "lang"), ("?", "help")],
        }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().add_modifier(Modifier::DIM);

        let spans: Vec<Span> = self
            .hints()
            .iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(*key, key_style),
                    Span::styled(format!(" {desc}  "), desc_style),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
