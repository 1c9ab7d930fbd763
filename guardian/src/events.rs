//! Event handling for the GuardianNet console

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use guardian_core::{VerificationStep, VolunteerPhase};
use tokio::time::Instant;

use crate::app::{App, InputMode, View};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event, now: Instant) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key, now),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if app.view != View::Assistant {
        return EventResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key, now),
        InputMode::Insert => handle_insert_mode(app, key, now),
    }
}

/// Keys that work on every view in NORMAL mode
fn handle_normal_mode(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    match key.code {
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('l') => {
            app.cycle_language();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.switch_view(View::ALL[index], now);
            EventResult::NeedsRedraw
        }
        // Tab moves between form fields on the verification screen
        KeyCode::Tab if app.view == View::Verification => {
            app.focus_field(app.form_field.next());
            EventResult::NeedsRedraw
        }
        KeyCode::Tab => {
            app.next_view(now);
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab => {
            app.prev_view(now);
            EventResult::NeedsRedraw
        }
        _ => match app.view {
            View::Map => handle_map_keys(app, key, now),
            View::Assistant => handle_assistant_keys(app, key, now),
            View::Verification => handle_verification_keys(app, key, now),
            View::Volunteer => handle_volunteer_keys(app, key, now),
            View::Dashboard => handle_dashboard_keys(app, key),
            View::Resources => handle_resources_keys(app, key),
        },
    }
}

fn handle_map_keys(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    let sim = &mut app.session.landslide;
    match key.code {
        KeyCode::Char('t') => {
            sim.toggle(now);
            let message = if sim.is_triggered() {
                "Landslide triggered. Scanning terrain..."
            } else {
                "Scenario reset"
            };
            app.set_status(message);
        }
        KeyCode::Char('r') => {
            sim.reset();
            app.set_status("Scenario reset");
        }
        KeyCode::Char('h') => sim.toggle_heat_layer(),
        KeyCode::Char('b') => {
            if !sim.toggle_briefing() {
                app.set_status("Trigger the landslide to open the tactical briefing");
            }
        }
        KeyCode::Char('z') => {
            if !sim.select_next_zone() {
                app.set_status("Trigger the landslide to open the tactical briefing");
            } else if let Some(zone) = sim.selected_zone() {
                let message = format!("{} - {}: {}", zone.name, zone.area, zone.task);
                app.set_status(message);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => sim.select_next_asset(),
        KeyCode::Char('k') | KeyCode::Up => sim.select_prev_asset(),
        KeyCode::Esc => sim.clear_selection(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_assistant_keys(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.session.assistant.open(now);
            app.input_mode = InputMode::Insert;
        }
        KeyCode::Char(c @ ('a' | 'b' | 'c')) => {
            app.send_suggestion(c as usize - 'a' as usize, now);
        }
        KeyCode::Char('x') => app.close_chat(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Char('G') | KeyCode::End => app.chat_scroll_back = 0,
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_verification_keys(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    match key.code {
        KeyCode::Char('i') => app.edit_field(),
        KeyCode::Char('j') | KeyCode::Down => app.focus_field(app.form_field.next()),
        KeyCode::Char('k') | KeyCode::Up => app.focus_field(app.form_field.prev()),
        KeyCode::Char('s') => {
            if *app.session.verification.step() == VerificationStep::Form {
                app.session.verification.form_mut().cycle_skill();
            }
        }
        KeyCode::Enter => app.submit_form(now),
        KeyCode::Char('r') => {
            if app.session.verification.retry() {
                app.set_status("Edit the form and try again");
            }
        }
        KeyCode::Char('x') => {
            app.session.verification.close();
            app.set_status("Verification closed");
        }
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_volunteer_keys(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    let phone = &mut app.session.volunteer;
    match key.code {
        KeyCode::Char('o') => phone.open(now),
        KeyCode::Char('a') => {
            if !phone.accept() {
                let message = if phone.phase() == VolunteerPhase::Accepted {
                    "Mission already accepted"
                } else {
                    "No mission is on offer"
                };
                app.set_status(message);
            }
        }
        KeyCode::Char('r') => {
            if phone.is_open() {
                phone.reject();
                app.set_status("Mission rejected");
            }
        }
        KeyCode::Char('x') | KeyCode::Esc => phone.close(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_dashboard_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('n') => {
            app.cycle_region();
            let region = app.session.dashboard.region();
            app.set_status(format!("Region: {region}"));
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_node_cursor(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_node_cursor(false),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_node_at_cursor(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_resources_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => app.move_resource_cursor(true),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => app.move_resource_cursor(false),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_resource_at_cursor(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys in INSERT mode (free text input)
fn handle_insert_mode(app: &mut App, key: KeyEvent, now: Instant) -> EventResult {
    match key.code {
        KeyCode::Esc => app.commit_input(),
        KeyCode::Enter => app.submit_input(now),
        KeyCode::Tab if app.view == View::Verification => app.focus_field(app.form_field.next()),
        KeyCode::BackTab if app.view == View::Verification => app.focus_field(app.form_field.prev()),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Char(c) => app.type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::{GuardianConfig, GuardianSession, JsonFileStore, LandslidePhase};
    use std::time::Duration;

    async fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = GuardianConfig::new()
            .with_lang_file(dir.path().join("settings.json"))
            .with_seed(3);
        let store = JsonFileStore::new(&config.lang_file);
        let session = GuardianSession::new(&config, store).await.unwrap();
        (App::new(session), dir)
    }

    fn press(app: &mut App, code: KeyCode, now: Instant) -> EventResult {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), now)
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        assert_eq!(press(&mut app, KeyCode::Char('q'), now), EventResult::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_event(&mut app, Event::Key(ctrl_c), now), EventResult::Quit);
    }

    #[tokio::test]
    async fn test_number_keys_switch_views() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('5'), now);
        assert_eq!(app.view, View::Dashboard);
        assert!(app.session.dashboard.is_running());
        press(&mut app, KeyCode::Char('1'), now);
        assert_eq!(app.view, View::Map);
        assert!(!app.session.dashboard.is_running());
    }

    #[tokio::test]
    async fn test_map_trigger_key() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('t'), now);
        app.tick(now + Duration::from_millis(3600));
        assert_eq!(app.session.landslide.phase(), LandslidePhase::FullDeployment);

        press(&mut app, KeyCode::Char('t'), now);
        assert_eq!(app.session.landslide.phase(), LandslidePhase::Idle);
    }

    #[tokio::test]
    async fn test_zone_keys_need_trigger() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('z'), now);
        assert!(app.session.landslide.selected_zone().is_none());

        press(&mut app, KeyCode::Char('t'), now);
        press(&mut app, KeyCode::Char('z'), now);
        press(&mut app, KeyCode::Char('z'), now);
        assert_eq!(app.session.landslide.selected_zone().map(|z| z.id), Some("zone-2"));
        assert_eq!(app.status_message(), Some("Zone 2 - Mundakkai: Search & Rescue"));

        press(&mut app, KeyCode::Char('r'), now);
        assert!(app.session.landslide.selected_zone().is_none());
        assert!(!app.session.landslide.briefing_visible());
    }

    #[tokio::test]
    async fn test_resources_view_keys() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('6'), now);
        assert_eq!(app.view, View::Resources);
        assert!(app.session.resources.is_counting());

        press(&mut app, KeyCode::Char('j'), now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.session.resources.expanded(), Some(1));

        press(&mut app, KeyCode::Char('1'), now);
        assert!(!app.session.resources.is_open());
    }

    #[tokio::test]
    async fn test_typing_in_chat_does_not_trigger_hotkeys() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('2'), now);
        press(&mut app, KeyCode::Char('i'), now);
        assert_eq!(app.input_mode, InputMode::Insert);

        for c in "quit".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(c), now), EventResult::NeedsRedraw);
        }
        press(&mut app, KeyCode::Enter, now);
        assert!(app.session.assistant.is_typing());
        assert_eq!(app.input_buffer(), "");
    }

    #[tokio::test]
    async fn test_volunteer_accept_needs_offer() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('4'), now);
        press(&mut app, KeyCode::Char('o'), now);
        press(&mut app, KeyCode::Char('a'), now);
        assert_eq!(app.status_message(), Some("No mission is on offer"));

        app.tick(now + Duration::from_millis(5500));
        press(&mut app, KeyCode::Char('a'), now);
        assert_eq!(app.session.volunteer.phase(), VolunteerPhase::Accepted);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let (mut app, _dir) = app().await;
        let now = Instant::now();
        press(&mut app, KeyCode::Char('?'), now);
        assert!(app.has_overlay());
        assert_eq!(press(&mut app, KeyCode::Char('t'), now), EventResult::Continue);
        assert!(!app.session.landslide.is_triggered());
        press(&mut app, KeyCode::Esc, now);
        assert!(!app.has_overlay());
    }
}
