//! Core types for TUI screens and actions

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Status overview with the notification feed
    Status,
    /// Label input for saving the current network
    SaveNetwork,
    /// Yes/no question asked by the permission broker
    PermissionPrompt,
}

/// Work the binary performs in response to a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do
    None,
    /// Exit the application
    Quit,
    /// Run a probe cycle right away
    RefreshNow,
    /// Save the current network under the given label
    SaveNetwork(String),
    /// Forget the saved network
    ForgetNetwork,
    /// Ask for notification permission
    RequestPermission,
    /// Answer a pending permission question
    AnswerPermission(bool),
}
