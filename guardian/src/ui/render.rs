//! Render orchestration for the GuardianNet console

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode, View};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{
    ChatWidget, DashboardWidget, HotkeyBarWidget, InputWidget, MapWidget, PhoneWidget,
    ResourcesWidget, StatusBarWidget, VerificationWidget,
};

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area, app.view.takes_text());

    render_title_bar(frame, app, layout.title_area);
    render_tabs(frame, app, layout.tabs_area);
    render_content(frame, app, layout.content_area);
    render_status_bar(frame, app, layout.status_bar);
    render_hotkey_bar(frame, app, layout.hotkey_bar);
    if let Some(input_area) = layout.input_area {
        render_input(frame, app, input_area);
    }

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let strings = app.strings();
    let line = Line::from(vec![
        Span::styled(" GuardianNet ", app.theme.heading_style()),
        Span::styled(format!("{} ", strings.title_lead), app.theme.text_style()),
        Span::styled(
            strings.title_emphasis,
            app.theme.text_style().add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
        Span::styled(
            format!("  {}", Local::now().format("%H:%M:%S")),
            app.theme.system_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let strings = app.strings();
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title(strings))))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(app.theme.system_style())
        .highlight_style(app.theme.title_style(true).add_modifier(Modifier::REVERSED))
        .divider("│");
    frame.render_widget(tabs, area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let strings = app.strings();
    let theme = &app.theme;

    match app.view {
        View::Map => frame.render_widget(MapWidget::new(&session.landslide, strings, theme), area),
        View::Assistant => frame.render_widget(
            ChatWidget::new(&session.assistant, theme)
                .scroll_back(app.chat_scroll_back)
                .focused(app.input_mode == InputMode::Normal),
            area,
        ),
        View::Verification => frame.render_widget(
            VerificationWidget::new(&session.verification, theme)
                .focused_field(app.form_field)
                .editing(app.input_mode == InputMode::Insert),
            area,
        ),
        View::Volunteer => {
            let clock = Local::now().format("%H:%M").to_string();
            frame.render_widget(
                PhoneWidget::new(&session.volunteer, strings, theme).clock(&clock),
                area,
            );
        }
        View::Dashboard => frame.render_widget(
            DashboardWidget::new(&session.dashboard, strings, theme).node_cursor(app.node_cursor),
            area,
        ),
        View::Resources => frame.render_widget(
            ResourcesWidget::new(&session.resources, theme).cursor(app.resource_cursor),
            area,
        ),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let widget = StatusBarWidget::new(
        app.input_mode,
        app.session.landslide.network(),
        app.session.language(),
        &app.theme,
    )
    .message(app.status_message());
    frame.render_widget(widget, area);
}

fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(HotkeyBarWidget::new(app.view, app.input_mode, &app.theme), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.input_mode == InputMode::Insert;
    let (title, placeholder) = match app.view {
        View::Verification => (app.form_field.label(), "Press i to edit the highlighted field"),
        _ => ("Message", "Press i to ask GuardianNet AI..."),
    };

    let input_widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .title(title)
        .active(is_active)
        .placeholder(placeholder);
    frame.render_widget(input_widget, area);
}

fn render_overlay(frame: &mut Frame, app: &App, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(title, Style::default().add_modifier(Modifier::UNDERLINED)))
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 34, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(" GuardianNet - Help ", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        section("Everywhere:"),
        Line::from("  1-6 / Tab   Switch view (Shift+Tab back)"),
        Line::from("  l           Cycle language (en, hi, ml)"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q / Ctrl+C  Quit"),
        Line::from(""),
        section("Live Map:"),
        Line::from("  t  Trigger or reset the landslide   r  Reset"),
        Line::from("  h  Toggle heat layer   j/k  Select asset"),
        Line::from("  b  Tactical briefing   z  Next zone protocol"),
        Line::from(""),
        section("Assistant:"),
        Line::from("  i  Type a message   a/b/c  Quick reply"),
        Line::from("  j/k  Scroll   x  Close chat"),
        Line::from(""),
        section("Verification:"),
        Line::from("  i  Edit field   Tab  Next field   s  Skill"),
        Line::from("  Enter  Verify   r  Retry   x  Close"),
        Line::from(""),
        section("Volunteer phone:"),
        Line::from("  o  Open   a  Accept   r  Reject   x  Exit"),
        Line::from(""),
        section("Dashboard:"),
        Line::from("  n  Next region   j/k  Move   Enter  Select node"),
        Line::from(""),
        section("Resources:"),
        Line::from("  j/k  Move   Enter  Expand or collapse card"),
        Line::from(""),
        Line::from(Span::styled("Press Esc or ? to close", Style::default().add_modifier(Modifier::DIM))),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(help_text).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}
