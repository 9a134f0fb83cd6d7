use crossterm::event::KeyCode;

/// Events that can occur in the details TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Run the location lookup again
    RefreshLocation,
    /// No action
    None,
}

impl DetailsEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => DetailsEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => DetailsEvent::ToggleHelp,
            KeyCode::Char('r') => DetailsEvent::RefreshLocation,
            _ => DetailsEvent::None,
        }
    }
}
