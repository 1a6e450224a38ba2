//! Trait for providing theme configuration to the reviews panel.

use crate::model::ReviewState;
use ratatui::style::Color;

/// Provides theme colors for the reviews panel.
///
/// Every color has a default; implement only what your application's theme
/// needs to override.
///
/// # Example
///
/// ```ignore
/// use gh_review_threads::ThemeProvider;
/// use ratatui::style::Color;
///
/// struct MyAppTheme;
///
/// impl ThemeProvider for MyAppTheme {
///     fn resolved_foreground(&self) -> Color {
///         Color::Rgb(80, 200, 120)
///     }
/// }
/// ```
pub trait ThemeProvider: Send + Sync {
    /// Foreground color for section titles.
    fn section_header_foreground(&self) -> Color {
        Color::Cyan
    }

    /// Foreground color for file path group headings.
    fn path_foreground(&self) -> Color {
        Color::Blue
    }

    /// Foreground color for author logins.
    fn author_foreground(&self) -> Color {
        Color::White
    }

    /// Foreground color for timestamps and other secondary text.
    fn muted_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for resolved threads.
    fn resolved_foreground(&self) -> Color {
        Color::Green
    }

    /// Foreground color for unresolved threads.
    fn unresolved_foreground(&self) -> Color {
        Color::Yellow
    }

    /// Foreground color for the "outdated" marker.
    fn outdated_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for the PENDING badge.
    fn pending_badge_foreground(&self) -> Color {
        Color::Black
    }

    /// Background color for the PENDING badge.
    fn pending_badge_background(&self) -> Color {
        Color::Yellow
    }

    /// Foreground color for a review summary's state verb.
    fn review_state_foreground(&self, state: ReviewState) -> Color {
        match state {
            ReviewState::Approved => Color::Green,
            ReviewState::ChangesRequested => Color::Red,
            ReviewState::Commented => Color::Blue,
            ReviewState::Dismissed | ReviewState::Pending => Color::DarkGray,
        }
    }

    /// Foreground color for added lines in the diff preview.
    fn addition_foreground(&self) -> Color {
        Color::Green
    }

    /// Foreground color for deleted lines in the diff preview.
    fn deletion_foreground(&self) -> Color {
        Color::Red
    }

    /// Background color for the cursor row.
    fn cursor_background(&self) -> Color {
        Color::Rgb(50, 50, 80)
    }

    /// Border color for the reply box.
    fn reply_border(&self) -> Color {
        Color::DarkGray
    }

    /// Border color for the reply box while it is being edited.
    fn reply_border_active(&self) -> Color {
        Color::Cyan
    }

    /// Foreground color for errors.
    fn error_foreground(&self) -> Color {
        Color::Red
    }

    /// Foreground color for key hints (the key part like "r", "R").
    fn hint_key_foreground(&self) -> Color {
        Color::Yellow
    }

    /// Foreground color for hint descriptions.
    fn hint_text_foreground(&self) -> Color {
        Color::DarkGray
    }
}

/// Default theme with sensible dark-mode colors.
#[derive(Debug, Clone, Default)]
pub struct DefaultTheme;

impl ThemeProvider for DefaultTheme {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = DefaultTheme;
        assert_eq!(theme.resolved_foreground(), Color::Green);
        assert_eq!(
            theme.review_state_foreground(ReviewState::ChangesRequested),
            Color::Red
        );
        assert_eq!(theme.cursor_background(), Color::Rgb(50, 50, 80));
    }
}
