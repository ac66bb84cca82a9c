// TUI Tests - app state, key handling and rendering

use crate::connectivity::{ConnectivityStatus, MonitorSnapshot, NetworkIdentity};
use crate::notify::PermissionState;
use crate::tui::app::MAX_FEED_LEN;
use crate::tui::screens::{SaveNetworkScreen, MAX_LABEL_LEN};
use crate::tui::ui::{centered_rect, format_elapsed_since, ui};
use crate::tui::{Action, App, Screen};
use crate::worker::DeliveredNotification;
use chrono::{Duration, Utc};
use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

fn office_snapshot(status: ConnectivityStatus) -> MonitorSnapshot {
    MonitorSnapshot {
        status,
        last_raw_ip: Some("203.0.113.10".to_string()),
        reference: Some(NetworkIdentity::new("Office", "203.0.113.10".parse().unwrap())),
        last_checked_at: Some(Utc::now()),
    }
}

fn delivered(title: &str) -> DeliveredNotification {
    DeliveredNotification {
        title: title.to_string(),
        body: "body".to_string(),
        worker_id: 1,
        delivered_at: Utc::now(),
    }
}

fn rendered_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|f| ui(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ========================================================================
// App state
// ========================================================================

#[test]
fn test_app_starts_on_status_screen() {
    let app = App::new(MonitorSnapshot::default(), PermissionState::Default);

    assert_eq!(app.current_screen, Screen::Status);
    assert!(!app.should_quit);
    assert_eq!(app.headline(), "… Checking network");
    assert_eq!(app.status_message.as_deref(), Some("Press 'p' to allow notifications"));
}

#[test]
fn test_app_with_granted_permission_has_no_hint() {
    let app = App::new(MonitorSnapshot::default(), PermissionState::Granted);
    assert!(app.status_message.is_none());
}

#[test]
fn test_headline_follows_snapshot() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Granted);

    app.update_snapshot(office_snapshot(ConnectivityStatus::Online));
    assert_eq!(app.headline(), "✅ Online: clocked in");

    app.update_snapshot(office_snapshot(ConnectivityStatus::Offline));
    assert_eq!(app.headline(), "❌ Offline: clocked out");
}

#[test]
fn test_notification_feed_is_capped_newest_first() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Granted);

    for i in 0..MAX_FEED_LEN + 5 {
        app.push_notification(delivered(&format!("n{}", i)));
    }

    assert_eq!(app.notifications.len(), MAX_FEED_LEN);
    assert_eq!(app.notifications[0].title, format!("n{}", MAX_FEED_LEN + 4));
}

#[test]
fn test_set_permission_reports_outcome() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Default);

    app.set_permission(PermissionState::Denied);

    assert_eq!(app.permission, PermissionState::Denied);
    assert_eq!(app.status_message.as_deref(), Some("Notification permission denied"));
}

// ========================================================================
// Key handling
// ========================================================================

#[test]
fn test_status_keys_map_to_actions() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Default);

    assert_eq!(app.handle_key(KeyCode::Char('r')), Action::RefreshNow);
    assert_eq!(app.status_message.as_deref(), Some("Checking network..."));
    assert_eq!(app.handle_key(KeyCode::Char('f')), Action::ForgetNetwork);
    assert_eq!(app.handle_key(KeyCode::Char('p')), Action::RequestPermission);
    assert_eq!(app.handle_key(KeyCode::Char('x')), Action::None);

    assert_eq!(app.handle_key(KeyCode::Char('q')), Action::Quit);
    assert!(app.should_quit);
}

#[test]
fn test_permission_key_when_already_granted() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Granted);

    assert_eq!(app.handle_key(KeyCode::Char('p')), Action::None);
    assert_eq!(app.status_message.as_deref(), Some("Notifications are already allowed"));
}

#[test]
fn test_save_network_flow() {
    let mut app = App::new(office_snapshot(ConnectivityStatus::Online), PermissionState::Granted);

    assert_eq!(app.handle_key(KeyCode::Char('s')), Action::None);
    assert_eq!(app.current_screen, Screen::SaveNetwork);
    assert_eq!(app.save_network_screen.as_ref().unwrap().input, "Office");

    for _ in 0.."Office".len() {
        app.handle_key(KeyCode::Backspace);
    }
    for c in "Lab".chars() {
        app.handle_key(KeyCode::Char(c));
    }

    assert_eq!(app.handle_key(KeyCode::Enter), Action::SaveNetwork("Lab".to_string()));
    assert_eq!(app.current_screen, Screen::Status);
    assert!(app.save_network_screen.is_none());
}

#[test]
fn test_save_network_escape_cancels() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Granted);

    app.handle_key(KeyCode::Char('s'));
    // 'q' is text here, not quit
    assert_eq!(app.handle_key(KeyCode::Char('q')), Action::None);
    assert!(!app.should_quit);

    assert_eq!(app.handle_key(KeyCode::Esc), Action::None);
    assert_eq!(app.current_screen, Screen::Status);
}

#[test]
fn test_save_network_rejects_blank_label() {
    let mut screen = SaveNetworkScreen::new(None);
    assert_eq!(screen.input, "Office");

    screen.input = "   ".to_string();

    assert_eq!(screen.submit(), None);
    assert!(screen.is_error);
    assert_eq!(screen.status_message.as_deref(), Some("Label cannot be empty"));
}

#[test]
fn test_save_network_label_length_is_limited() {
    let mut screen = SaveNetworkScreen::new(Some(""));
    for _ in 0..MAX_LABEL_LEN + 10 {
        screen.add_char('a');
    }
    assert_eq!(screen.input.chars().count(), MAX_LABEL_LEN);
}

#[test]
fn test_permission_prompt_screen() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Default);

    app.set_permission_prompt(true);
    assert_eq!(app.current_screen, Screen::PermissionPrompt);

    assert_eq!(app.handle_key(KeyCode::Char('y')), Action::AnswerPermission(true));
    assert_eq!(app.current_screen, Screen::Status);

    app.set_permission_prompt(true);
    assert_eq!(app.handle_key(KeyCode::Esc), Action::AnswerPermission(false));

    // Question withdrawn elsewhere
    app.set_permission_prompt(true);
    app.set_permission_prompt(false);
    assert_eq!(app.current_screen, Screen::Status);
}

#[test]
fn test_permission_prompt_does_not_interrupt_typing() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Default);
    app.handle_key(KeyCode::Char('s'));

    app.set_permission_prompt(true);

    assert_eq!(app.current_screen, Screen::SaveNetwork);
}

// ========================================================================
// Rendering
// ========================================================================

#[test]
fn test_render_status_screen() {
    let mut app = App::new(office_snapshot(ConnectivityStatus::Online), PermissionState::Granted);
    app.push_notification(delivered("Wi-Fi connected"));

    let text = rendered_text(&app);

    assert!(text.contains("Online"));
    assert!(text.contains("Office"));
    assert!(text.contains("203.0.113.10"));
    assert!(text.contains("Wi-Fi connected"));
}

#[test]
fn test_render_dialogs() {
    let mut app = App::new(MonitorSnapshot::default(), PermissionState::Default);

    app.handle_key(KeyCode::Char('s'));
    assert!(rendered_text(&app).contains("Office"));

    app.back_to_status();
    app.set_permission_prompt(true);
    // Drawing the overlay must not panic on a small terminal either
    let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
    terminal.draw(|f| ui(f, &app)).unwrap();
}

// ========================================================================
// Helpers
// ========================================================================

#[test]
fn test_format_elapsed_since() {
    assert_eq!(format_elapsed_since(Utc::now()), "just now");
    assert_eq!(format_elapsed_since(Utc::now() - Duration::minutes(5)), "5 minutes ago");
    assert_eq!(format_elapsed_since(Utc::now() - Duration::hours(3)), "3 hours ago");
}

#[test]
fn test_centered_rect_fits_inside_area() {
    let area = Rect::new(0, 0, 80, 24);
    let rect = centered_rect(40, 10, area);

    assert_eq!(rect.width, 40);
    assert_eq!(rect.height, 10);
    assert!(rect.right() <= area.right() && rect.bottom() <= area.bottom());

    let clipped = centered_rect(200, 50, area);
    assert!(clipped.width <= area.width && clipped.height <= area.height);
}
