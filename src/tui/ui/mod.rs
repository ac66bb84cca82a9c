//! UI rendering module - screen-specific rendering functions

mod helpers;
mod permission_prompt;
mod save_network;
mod status;

use ratatui::Frame;
use crate::tui::types::Screen;
use crate::tui::app::App;

// Re-export render functions
pub use permission_prompt::render_permission_prompt;
pub use save_network::render_save_network;
pub use status::render_status;

// Re-export helper functions
pub use helpers::{centered_rect, format_elapsed_since};

/// Main UI rendering function - dispatches to screen-specific render functions
///
/// Dialog screens draw over the status screen.
pub fn ui(f: &mut Frame, app: &App) {
    render_status(f, app);

    match app.current_screen {
        Screen::Status => {}
        Screen::SaveNetwork => render_save_network(f, app),
        Screen::PermissionPrompt => render_permission_prompt(f, app),
    }
}
