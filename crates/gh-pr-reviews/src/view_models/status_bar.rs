//! Status Bar View Model
//!
//! Pre-computes presentation data for the status bar.

use crate::state::AppState;
use ratatui::style::{Color, Modifier, Style};

/// View model for rendering the status bar
#[derive(Debug, Clone)]
pub struct StatusBarViewModel {
    /// Emoji/icon for the status
    pub emoji: &'static str,
    /// The message text
    pub message: String,
    /// Working copy state shown on the right
    pub working_copy: String,
    pub message_style: Style,
    pub bg_color: Color,
    pub metadata_style: Style,
}

impl StatusBarViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let theme = &state.theme;
        let reviews = &state.reviews;

        let (emoji, message, color) = if reviews.loading {
            ("⏳", "Loading reviews…".to_string(), theme.status_warning)
        } else if reviews.panel.posting().is_some() {
            ("📤", "Posting reply…".to_string(), theme.status_info)
        } else if let Some(loaded) = reviews.last_loaded {
            (
                "✅",
                format!("Updated {}", loaded.format("%H:%M:%S")),
                theme.status_success,
            )
        } else {
            ("👋", "Connecting to GitHub…".to_string(), theme.text_muted)
        };

        let working_copy = if !reviews.panel.is_loaded() {
            String::new()
        } else if reviews.panel.is_checked_out() {
            format!("checked out at {}", state.target.workdir.display())
        } else {
            "not checked out".to_string()
        };

        Self {
            emoji,
            message,
            working_copy,
            message_style: Style::default().fg(color).add_modifier(Modifier::BOLD),
            bg_color: theme.bg_primary,
            metadata_style: theme.muted_style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ReviewsPanelAction};
    use crate::reducer::reduce;

    #[test]
    fn test_loading_message() {
        let state = reduce(
            AppState::for_tests(),
            &Action::Reviews(ReviewsPanelAction::LoadStart),
        );
        let vm = StatusBarViewModel::from_state(&state);
        assert_eq!(vm.message, "Loading reviews…");
        assert!(vm.working_copy.is_empty());
    }
}
