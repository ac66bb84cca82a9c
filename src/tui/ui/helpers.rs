//! UI helper functions

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Format the time elapsed since `instant` in human-readable form
pub fn format_elapsed_since(instant: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(instant);

    if elapsed.num_hours() > 0 {
        format!("{} hours ago", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{} minutes ago", elapsed.num_minutes())
    } else if elapsed.num_seconds() > 1 {
        format!("{} seconds ago", elapsed.num_seconds())
    } else {
        "just now".to_string()
    }
}

/// Rectangle of `width` x `height` cells centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
