//! Save network dialog rendering

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use crate::tui::app::App;
use super::helpers::centered_rect;

/// Renders the screen
pub fn render_save_network(f: &mut Frame, app: &App) {
    let Some(screen) = &app.save_network_screen else {
        return;
    };

    let area = centered_rect(60, 9, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Save current network");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Input
            Constraint::Min(1),     // Status
        ])
        .split(inner);

    let input = Paragraph::new(format!("{}_", screen.input))
        .block(Block::default().borders(Borders::ALL).title("Label"));
    f.render_widget(input, chunks[0]);

    let status_color = if screen.is_error { Color::Red } else { Color::Gray };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            screen.status_message.clone().unwrap_or_default(),
            Style::default().fg(status_color),
        ),
        Span::styled("  (Esc to cancel)", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(status, chunks[1]);
}
