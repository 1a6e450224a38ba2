//! Global actions - not tied to the panel
//!
//! These actions affect the application as a whole.

use ratatui::crossterm::event::KeyEvent;

/// Global actions that affect the entire application
#[derive(Debug, Clone)]
pub enum GlobalAction {
    /// Raw key pressed (before translation)
    KeyPressed(KeyEvent),
    /// Terminal was resized
    Resize { width: u16, height: u16 },
    /// Quit the application
    Quit,
}
