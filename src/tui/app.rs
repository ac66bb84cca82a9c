//! Main TUI application state and logic
//!
//! `App` holds presentation state only; every side effect is returned as an
//! [`Action`] for the binary to run on the tokio runtime.

use crate::connectivity::{ConnectivityStatus, MonitorSnapshot};
use crate::notify::PermissionState;
use crate::tui::screens::SaveNetworkScreen;
use crate::tui::types::{Action, Screen};
use crate::worker::DeliveredNotification;
use crossterm::event::KeyCode;
use std::collections::VecDeque;

/// Number of delivered notifications kept in the feed
pub const MAX_FEED_LEN: usize = 20;

/// Application state
pub struct App {
    /// Current screen
    pub current_screen: Screen,
    /// Latest monitor snapshot
    pub snapshot: MonitorSnapshot,
    /// Current notification permission
    pub permission: PermissionState,
    /// Delivered notifications, newest first
    pub notifications: VecDeque<DeliveredNotification>,
    /// Save network screen (when active)
    pub save_network_screen: Option<SaveNetworkScreen>,
    /// Footer status message
    pub status_message: Option<String>,
    /// Should quit
    pub should_quit: bool,
}

impl App {
    /// Create new application
    pub fn new(snapshot: MonitorSnapshot, permission: PermissionState) -> Self {
        let status_message = match permission {
            PermissionState::Granted => None,
            _ => Some("Press 'p' to allow notifications".to_string()),
        };

        Self {
            current_screen: Screen::Status,
            snapshot,
            permission,
            notifications: VecDeque::new(),
            save_network_screen: None,
            status_message,
            should_quit: false,
        }
    }

    /// Headline shown at the top of the status screen
    pub fn headline(&self) -> &'static str {
        match self.snapshot.status {
            ConnectivityStatus::Online => "✅ Online: clocked in",
            ConnectivityStatus::Offline => "❌ Offline: clocked out",
            ConnectivityStatus::Unknown => "… Checking network",
        }
    }

    /// Replace the monitor snapshot
    pub fn update_snapshot(&mut self, snapshot: MonitorSnapshot) {
        self.snapshot = snapshot;
    }

    /// Add a delivered notification to the feed
    pub fn push_notification(&mut self, notification: DeliveredNotification) {
        self.notifications.push_front(notification);
        self.notifications.truncate(MAX_FEED_LEN);
    }

    /// Set footer status message
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Record a resolved permission request
    pub fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
        self.set_status_message(format!("Notification permission {}", permission));
    }

    /// Sync with the permission prompt
    ///
    /// Shows the prompt while a question is waiting and leaves it once the
    /// question is gone.
    pub fn set_permission_prompt(&mut self, waiting: bool) {
        match (waiting, self.current_screen) {
            (true, Screen::Status) => self.current_screen = Screen::PermissionPrompt,
            (false, Screen::PermissionPrompt) => self.current_screen = Screen::Status,
            _ => {}
        }
    }

    /// Open the save network screen
    pub fn show_save_network_screen(&mut self) {
        let label = self.snapshot.reference.as_ref().map(|identity| identity.label.as_str());
        self.save_network_screen = Some(SaveNetworkScreen::new(label));
        self.current_screen = Screen::SaveNetwork;
    }

    /// Return to the status screen
    pub fn back_to_status(&mut self) {
        self.save_network_screen = None;
        self.current_screen = Screen::Status;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match self.current_screen {
            Screen::Status => self.handle_status_key(code),
            Screen::SaveNetwork => self.handle_save_network_key(code),
            Screen::PermissionPrompt => self.handle_permission_key(code),
        }
    }

    fn handle_status_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Char('s') => {
                self.show_save_network_screen();
                Action::None
            }
            KeyCode::Char('f') => Action::ForgetNetwork,
            KeyCode::Char('r') => {
                self.set_status_message("Checking network...");
                Action::RefreshNow
            }
            KeyCode::Char('p') => {
                if self.permission == PermissionState::Granted {
                    self.set_status_message("Notifications are already allowed");
                    Action::None
                } else {
                    Action::RequestPermission
                }
            }
            _ => Action::None,
        }
    }

    fn handle_save_network_key(&mut self, code: KeyCode) -> Action {
        let Some(screen) = self.save_network_screen.as_mut() else {
            self.back_to_status();
            return Action::None;
        };

        match code {
            KeyCode::Esc => {
                self.back_to_status();
                Action::None
            }
            KeyCode::Enter => match screen.submit() {
                Some(label) => {
                    self.back_to_status();
                    self.set_status_message(format!("Saving current network as {:?}...", label));
                    Action::SaveNetwork(label)
                }
                None => Action::None,
            },
            KeyCode::Backspace => {
                screen.backspace();
                Action::None
            }
            KeyCode::Char(c) => {
                screen.add_char(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_permission_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.current_screen = Screen::Status;
                Action::AnswerPermission(true)
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.current_screen = Screen::Status;
                Action::AnswerPermission(false)
            }
            _ => Action::None,
        }
    }
}
