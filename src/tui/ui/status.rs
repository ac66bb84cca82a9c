//! Status screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use crate::connectivity::ConnectivityStatus;
use crate::notify::PermissionState;
use crate::tui::app::App;
use super::helpers::format_elapsed_since;

/// Renders the screen
pub fn render_status(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Headline
            Constraint::Length(7),  // Network details
            Constraint::Min(5),     // Notification feed
            Constraint::Length(3),  // Help / status message
        ])
        .split(size);

    // Headline
    let headline_color = match app.snapshot.status {
        ConnectivityStatus::Online => Color::Green,
        ConnectivityStatus::Offline => Color::Red,
        ConnectivityStatus::Unknown => Color::Gray,
    };
    let headline = Paragraph::new(app.headline())
        .style(
            Style::default()
                .fg(headline_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Netpresence"));
    f.render_widget(headline, chunks[0]);

    // Network details
    let saved = match &app.snapshot.reference {
        Some(identity) => format!("{} ({})", identity.label, identity.reference_ip),
        None => "none - press 's' while on the network you want to track".to_string(),
    };
    let current = app
        .snapshot
        .last_raw_ip
        .clone()
        .unwrap_or_else(|| "not checked yet".to_string());
    let checked = app
        .snapshot
        .last_checked_at
        .map(format_elapsed_since)
        .unwrap_or_else(|| "never".to_string());
    let permission_color = match app.permission {
        PermissionState::Granted => Color::Green,
        PermissionState::Denied => Color::Red,
        PermissionState::Default => Color::Yellow,
    };

    let details = vec![
        Line::from(vec![
            Span::styled("Saved network: ", Style::default().fg(Color::Cyan)),
            Span::raw(saved),
        ]),
        Line::from(vec![
            Span::styled("Current IP:    ", Style::default().fg(Color::Cyan)),
            Span::raw(current),
        ]),
        Line::from(vec![
            Span::styled("Last checked:  ", Style::default().fg(Color::Cyan)),
            Span::raw(checked),
        ]),
        Line::from(vec![
            Span::styled("Notifications: ", Style::default().fg(Color::Cyan)),
            Span::styled(app.permission.to_string(), Style::default().fg(permission_color)),
        ]),
    ];
    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Network"))
        .wrap(Wrap { trim: true });
    f.render_widget(details_widget, chunks[1]);

    // Notification feed
    let items: Vec<ListItem> = if app.notifications.is_empty() {
        vec![ListItem::new(Span::styled(
            "No notifications yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.notifications
            .iter()
            .map(|notification| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", notification.delivered_at.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{} ", notification.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(notification.body.clone()),
                ]))
            })
            .collect()
    };
    let feed = List::new(items).block(Block::default().borders(Borders::ALL).title("Notifications"));
    f.render_widget(feed, chunks[2]);

    // Help / status message
    let footer = match &app.status_message {
        Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(Color::Yellow))),
        None => Line::from(Span::styled(
            "s: save current network | f: forget | r: refresh | p: allow notifications | q: quit",
            Style::default().fg(Color::Gray),
        )),
    };
    let help = Paragraph::new(footer)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}
