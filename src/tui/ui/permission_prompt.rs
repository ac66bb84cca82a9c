//! Permission prompt rendering

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use crate::tui::app::App;
use super::helpers::centered_rect;

/// Renders the screen
pub fn render_permission_prompt(f: &mut Frame, _app: &App) {
    let area = centered_rect(56, 7, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from("Allow Netpresence to show notifications when"),
        Line::from("you join or leave your saved network?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(": allow   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(": deny"),
        ]),
    ];

    let prompt = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Notifications"));
    f.render_widget(prompt, area);
}
