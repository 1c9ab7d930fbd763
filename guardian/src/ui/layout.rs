//! Layout calculations for the GuardianNet console

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The main screen areas
pub struct AppLayout {
    pub title_area: Rect,
    pub tabs_area: Rect,
    pub content_area: Rect,
    pub status_bar: Rect,
    pub hotkey_bar: Rect,
    pub input_area: Option<Rect>,
}

impl AppLayout {
    /// Calculate layout based on terminal size. The input line is only
    /// reserved for views that take typed text.
    pub fn calculate(area: Rect, with_input: bool) -> Self {
        let input_height = if with_input { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Title bar
                Constraint::Length(1),            // View tabs
                Constraint::Min(8),               // Main content
                Constraint::Length(1),            // Status bar
                Constraint::Length(1),            // Hotkey bar
                Constraint::Length(input_height), // Input area
            ])
            .split(area);

        Self {
            title_area: chunks[0],
            tabs_area: chunks[1],
            content_area: chunks[2],
            status_bar: chunks[3],
            hotkey_bar: chunks[4],
            input_area: with_input.then_some(chunks[5]),
        }
    }
}

/// Split an area into a main pane and a sidebar.
pub fn split_sidebar(area: Rect, main_percent: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(main_percent),
            Constraint::Percentage(100 - main_percent.min(100)),
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// A fixed-size rectangle centered in `area`, shrunk to fit.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_area_is_optional() {
        let area = Rect::new(0, 0, 100, 40);
        assert!(AppLayout::calculate(area, false).input_area.is_none());
        let layout = AppLayout::calculate(area, true);
        assert_eq!(layout.input_area.map(|r| r.height), Some(3));
        assert_eq!(layout.title_area.height, 1);
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect_fixed(60, 20, area);
        assert_eq!(popup, Rect::new(0, 0, 40, 10));
        assert_eq!(centered_rect_fixed(20, 4, area), Rect::new(10, 3, 20, 4));
    }
}
