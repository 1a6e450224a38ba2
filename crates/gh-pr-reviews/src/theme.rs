//! Color palette and its adapter for the reviews panel widget

use gh_review_threads::{ReviewState, ThemeProvider};
use ratatui::style::palette::tailwind;
use ratatui::style::{Color, Modifier, Style};

/// Application color theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Background colors
    pub bg_primary: Color,
    pub bg_panel: Color,

    // Text colors
    pub text_primary: Color,
    pub text_muted: Color,
    pub text_header: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Status colors
    pub status_success: Color,
    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,

    // Selection colors
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg_primary: tailwind::SLATE.c950,
            bg_panel: tailwind::SLATE.c900,

            text_primary: tailwind::SLATE.c100,
            text_muted: tailwind::SLATE.c400,
            text_header: tailwind::SLATE.c200,

            accent_primary: tailwind::CYAN.c400,
            accent_secondary: tailwind::CYAN.c600,

            status_success: tailwind::GREEN.c400,
            status_error: tailwind::RED.c400,
            status_warning: tailwind::YELLOW.c400,
            status_info: tailwind::BLUE.c400,

            selected_bg: tailwind::SLATE.c700,
            selected_fg: Color::White,
        }
    }

    /// Style for the header line
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.text_header)
            .bg(self.bg_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }
}

/// Adapter exposing [`Theme`] to the reviews panel widget
pub struct ReviewsThemeAdapter<'a>(pub &'a Theme);

impl ThemeProvider for ReviewsThemeAdapter<'_> {
    fn section_header_foreground(&self) -> Color {
        self.0.text_header
    }

    fn path_foreground(&self) -> Color {
        self.0.accent_primary
    }

    fn author_foreground(&self) -> Color {
        self.0.accent_secondary
    }

    fn muted_foreground(&self) -> Color {
        self.0.text_muted
    }

    fn resolved_foreground(&self) -> Color {
        self.0.status_success
    }

    fn unresolved_foreground(&self) -> Color {
        self.0.status_warning
    }

    fn outdated_foreground(&self) -> Color {
        self.0.text_muted
    }

    fn review_state_foreground(&self, state: ReviewState) -> Color {
        match state {
            ReviewState::Approved => self.0.status_success,
            ReviewState::ChangesRequested => self.0.status_error,
            ReviewState::Pending => self.0.status_warning,
            ReviewState::Commented | ReviewState::Dismissed => self.0.text_muted,
        }
    }

    fn cursor_background(&self) -> Color {
        self.0.selected_bg
    }

    fn reply_border_active(&self) -> Color {
        self.0.accent_primary
    }

    fn error_foreground(&self) -> Color {
        self.0.status_error
    }

    fn hint_key_foreground(&self) -> Color {
        self.0.accent_primary
    }

    fn hint_text_foreground(&self) -> Color {
        self.0.text_muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_maps_review_states() {
        let theme = Theme::default();
        let adapter = ReviewsThemeAdapter(&theme);
        assert_eq!(
            adapter.review_state_foreground(ReviewState::Approved),
            theme.status_success
        );
        assert_eq!(
            adapter.review_state_foreground(ReviewState::ChangesRequested),
            theme.status_error
        );
        assert_eq!(adapter.cursor_background(), theme.selected_bg);
    }
}
