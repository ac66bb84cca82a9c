//! Screen state structures for TUI

/// Longest label accepted for a saved network
pub const MAX_LABEL_LEN: usize = 40;

/// Save Network screen state
#[derive(Debug)]
pub struct SaveNetworkScreen {
    /// Input buffer for the label
    pub input: String,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the status is an error
    pub is_error: bool,
}

impl SaveNetworkScreen {
    /// Create new save network screen, prefilled with `label`
    pub fn new(label: Option<&str>) -> Self {
        Self {
            input: label.unwrap_or("Office").to_string(),
            status_message: Some("Name this network and press Enter to save".to_string()),
            is_error: false,
        }
    }

    /// Add character to input
    pub fn add_char(&mut self, c: char) {
        if self.input.chars().count() < MAX_LABEL_LEN {
            self.input.push(c);
        }
    }

    /// Remove last character from input
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Validate the input
    ///
    /// Returns the trimmed label, or sets an error message and returns `None`.
    pub fn submit(&mut self) -> Option<String> {
        let label = self.input.trim();

        if label.is_empty() {
            self.status_message = Some("Label cannot be empty".to_string());
            self.is_error = true;
            return None;
        }

        Some(label.to_string())
    }
}
