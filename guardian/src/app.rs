//! Main application state and logic

use guardian_core::headless::notice_lines;
use guardian_core::language::Strings;
use guardian_core::{GuardianSession, JsonFileStore, Language, Notice};
use tokio::time::Instant;

use crate::ui::theme::GuardianTheme;
use crate::ui::Overlay;

/// The demo screens, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Map,
    Assistant,
    Verification,
    Volunteer,
    Dashboard,
    Resources,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Map,
        View::Assistant,
        View::Verification,
        View::Volunteer,
        View::Dashboard,
        View::Resources,
    ];

    pub fn title(&self, strings: &Strings) -> &'static str {
        match self {
            View::Map => strings.view_map,
            View::Assistant => "GuardianNet AI",
            View::Verification => "Verification",
            View::Volunteer => strings.volunteer,
            View::Dashboard => strings.ksdma,
            View::Resources => "Resources",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> View {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the view has a text input line.
    pub fn takes_text(&self) -> bool {
        matches!(self, View::Assistant | View::Verification)
    }
}

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and hotkeys
    #[default]
    Normal,
    /// Free text input
    Insert,
}

/// Editable text fields on the verification form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    FullName,
    Mobile,
    IdNumber,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::FullName => FormField::Mobile,
            FormField::Mobile => FormField::IdNumber,
            FormField::IdNumber => FormField::FullName,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::FullName => FormField::IdNumber,
            FormField::Mobile => FormField::FullName,
            FormField::IdNumber => FormField::Mobile,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FullName => "Full Name",
            FormField::Mobile => "Mobile",
            FormField::IdNumber => "License / ID",
        }
    }
}

/// Main application state
pub struct App {
    pub session: GuardianSession<JsonFileStore>,

    // UI state
    pub theme: GuardianTheme,
    pub view: View,
    overlay: Option<Overlay>,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub form_field: FormField,

    // Per-view cursors
    pub chat_scroll_back: usize,
    pub node_cursor: usize,
    pub resource_cursor: usize,

    // Status
    status_message: Option<String>,
    pub pending_language: Option<Language>,
}

impl App {
    pub fn new(session: GuardianSession<JsonFileStore>) -> Self {
        Self {
            session,
            theme: GuardianTheme::default(),
            view: View::default(),
            overlay: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            form_field: FormField::default(),
            chat_scroll_back: 0,
            node_cursor: 0,
            resource_cursor: 0,
            status_message: Some("Press ? for help, t to trigger the landslide".to_string()),
            pending_language: None,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.session.strings()
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance every machine and surface what changed.
    pub fn tick(&mut self, now: Instant) {
        for notice in self.session.tick(now) {
            let summary = summarize(&notice);
            tracing::debug!(%summary, "notice");
            if matches!(notice, Notice::AssistantMessage(_)) {
                self.chat_scroll_back = 0;
            }
            self.status_message = Some(summary);
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Switch screens, starting or stopping the machines that only run
    /// while visible.
    pub fn switch_view(&mut self, view: View, now: Instant) {
        if view == self.view {
            return;
        }
        self.commit_input();
        self.input_mode = InputMode::Normal;

        match self.view {
            View::Volunteer => self.session.volunteer.close(),
            View::Dashboard => self.session.dashboard.close(),
            View::Resources => self.session.resources.close(),
            _ => {}
        }
        match view {
            View::Assistant => self.session.assistant.open(now),
            View::Dashboard => self.session.dashboard.open(now),
            View::Resources => self.session.resources.open(now),
            _ => {}
        }
        self.view = view;
    }

    pub fn next_view(&mut self, now: Instant) {
        self.switch_view(self.view.next(), now);
    }

    pub fn prev_view(&mut self, now: Instant) {
        self.switch_view(self.view.prev(), now);
    }

    /// Queue a language change; the event loop persists it.
    pub fn cycle_language(&mut self) {
        let next = self.pending_language.unwrap_or(self.session.language()).next();
        self.pending_language = Some(next);
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    pub fn send_chat(&mut self, text: &str, now: Instant) {
        if self.session.assistant.send(text, now) {
            self.chat_scroll_back = 0;
        }
    }

    /// Send quick-reply chip `index`, if one is showing.
    pub fn send_suggestion(&mut self, index: usize, now: Instant) {
        let Some(text) = self.session.assistant.quick_suggestions().get(index).cloned() else {
            return;
        };
        self.send_chat(&text, now);
    }

    /// Close the chat, dropping the transcript.
    pub fn close_chat(&mut self) {
        self.session.assistant.close();
        self.chat_scroll_back = 0;
        self.set_status("Chat closed");
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_sub(lines);
    }

    // =========================================================================
    // Verification form
    // =========================================================================

    fn field_value(&self, field: FormField) -> &str {
        let form = self.session.verification.form();
        match field {
            FormField::FullName => &form.full_name,
            FormField::Mobile => &form.mobile,
            FormField::IdNumber => &form.id_number,
        }
    }

    /// Start editing the focused form field.
    pub fn edit_field(&mut self) {
        if self.session.verification.step().is_busy() {
            return;
        }
        let value = self.field_value(self.form_field).to_string();
        self.set_input(value);
        self.input_mode = InputMode::Insert;
    }

    /// Write the input buffer into the focused form field.
    fn commit_field(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;
        let form = self.session.verification.form_mut();
        match self.form_field {
            FormField::FullName => form.full_name = value,
            FormField::Mobile => form.mobile = value,
            FormField::IdNumber => form.id_number = value,
        }
    }

    /// Commit the current field and start editing the next one.
    pub fn focus_field(&mut self, field: FormField) {
        if self.input_mode == InputMode::Insert {
            self.commit_field();
            self.form_field = field;
            self.edit_field();
        } else {
            self.form_field = field;
        }
    }

    pub fn submit_form(&mut self, now: Instant) {
        if self.input_mode == InputMode::Insert {
            self.commit_field();
            self.input_mode = InputMode::Normal;
        }
        if !self.session.verification.submit(now) {
            self.set_status("Fill in name, mobile and ID before verifying");
        }
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub fn move_node_cursor(&mut self, forward: bool) {
        let count = self.session.dashboard.view().bundle.risk_nodes.len();
        self.node_cursor = if forward {
            (self.node_cursor + 1) % count
        } else {
            (self.node_cursor + count - 1) % count
        };
    }

    pub fn toggle_node_at_cursor(&mut self) {
        let name = self.session.dashboard.view().bundle.risk_nodes[self.node_cursor].name;
        self.session.dashboard.toggle_node(name);
    }

    pub fn cycle_region(&mut self) {
        self.session.dashboard.cycle_region();
        self.node_cursor = 0;
    }

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn move_resource_cursor(&mut self, forward: bool) {
        let count = guardian_core::RESOURCE_CATEGORIES.len();
        self.resource_cursor = if forward {
            (self.resource_cursor + 1) % count
        } else {
            (self.resource_cursor + count - 1) % count
        };
    }

    pub fn toggle_resource_at_cursor(&mut self) {
        self.session.resources.toggle_expanded(self.resource_cursor);
    }

    // =========================================================================
    // Input buffer
    // =========================================================================

    /// Finish insert mode, routing the typed text to the current view.
    pub fn submit_input(&mut self, now: Instant) {
        match self.view {
            View::Assistant => {
                let input = std::mem::take(&mut self.input_buffer);
                self.cursor_position = 0;
                self.send_chat(&input, now);
            }
            View::Verification => {
                self.commit_field();
                if self.form_field == FormField::IdNumber {
                    self.input_mode = InputMode::Normal;
                    self.submit_form(now);
                } else {
                    self.form_field = self.form_field.next();
                    self.edit_field();
                }
            }
            _ => {}
        }
    }

    /// Leave insert mode without losing form edits.
    pub fn commit_input(&mut self) {
        if self.input_mode == InputMode::Insert && self.view == View::Verification {
            self.commit_field();
        }
        self.input_mode = InputMode::Normal;
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    fn set_input(&mut self, value: String) {
        self.input_buffer = value;
        self.cursor_end();
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    // =========================================================================
    // Overlay and status
    // =========================================================================

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

/// One-line summary of a notice for the status bar.
fn summarize(notice: &Notice) -> String {
    let lines = notice_lines(notice);
    match lines.as_slice() {
        [tag, first, ..] if tag.as_str() == "[ASSISTANT]" => format!("{tag} {}", first.trim()),
        [line, ..] => line.clone(),
        [] => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::GuardianConfig;

    async fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = GuardianConfig::new()
            .with_lang_file(dir.path().join("settings.json"))
            .with_seed(8);
        let store = JsonFileStore::new(&config.lang_file);
        let session = GuardianSession::new(&config, store).await.unwrap();
        (App::new(session), dir)
    }

    #[tokio::test]
    async fn test_view_cycle_opens_and_closes_machines() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();

        app.switch_view(View::Dashboard, now);
        assert!(app.session.dashboard.is_running());
        app.next_view(now);
        assert_eq!(app.view, View::Resources);
        assert!(!app.session.dashboard.is_running());
        assert!(app.session.resources.is_open());

        app.next_view(now);
        assert_eq!(app.view, View::Map);
        assert!(!app.session.resources.is_open());

        app.prev_view(now);
        app.prev_view(now);
        assert_eq!(app.view, View::Dashboard);
        app.prev_view(now);
        assert_eq!(app.view, View::Volunteer);
    }

    #[tokio::test]
    async fn test_leaving_volunteer_closes_phone() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        app.switch_view(View::Volunteer, now);
        app.session.volunteer.open(now);
        assert!(app.session.volunteer.is_open());

        app.switch_view(View::Map, now);
        assert!(!app.session.volunteer.is_open());
        assert_eq!(app.session.volunteer.next_deadline(), None);

        // Nothing keeps running off screen.
        let notices = app.session.tick(now + std::time::Duration::from_millis(6000));
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_resource_cards_count_and_expand() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        app.switch_view(View::Resources, now);
        app.tick(now + std::time::Duration::from_millis(2100));
        assert_eq!(app.session.resources.count(0), 42);
        assert_eq!(app.status_message(), Some("[RESOURCES] All counts verified"));

        app.move_resource_cursor(false);
        assert_eq!(app.resource_cursor, 3);
        app.toggle_resource_at_cursor();
        assert_eq!(app.session.resources.expanded(), Some(3));
        app.toggle_resource_at_cursor();
        assert_eq!(app.session.resources.expanded(), None);
    }

    #[tokio::test]
    async fn test_form_editing_flow() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        app.switch_view(View::Verification, now);

        app.edit_field();
        for c in "Arun K".chars() {
            app.type_char(c);
        }
        app.submit_input(now);
        assert_eq!(app.form_field, FormField::Mobile);
        for c in "98765".chars() {
            app.type_char(c);
        }
        app.submit_input(now);
        for c in "DGCA-2024-001".chars() {
            app.type_char(c);
        }
        app.submit_input(now);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.session.verification.step().is_busy());
        assert_eq!(app.session.verification.form().full_name, "Arun K");
    }

    #[tokio::test]
    async fn test_unicode_editing() {
        let (mut app, _dir) = app().await;
        for c in "മഴ".chars() {
            app.type_char(c);
        }
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input_buffer(), "ഴ");
        app.delete();
        assert_eq!(app.input_buffer(), "");
    }

    #[tokio::test]
    async fn test_tick_updates_status() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        app.session.landslide.start(now);
        app.tick(now + std::time::Duration::from_millis(1200));
        assert!(app.status_message().unwrap().starts_with("[MAP]"));
    }

    #[tokio::test]
    async fn test_cycle_language_is_queued() {
        let (mut app, _dir) = app().await;
        app.cycle_language();
        app.cycle_language();
        assert_eq!(app.pending_language, Some(Language::Ml));
        assert_eq!(app.session.language(), Language::En);
    }
}
