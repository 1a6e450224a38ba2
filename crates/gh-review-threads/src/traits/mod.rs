//! Extension traits for customizing reviews panel behavior.

mod review_actions;
mod theme_provider;

pub use review_actions::{ReviewActionError, ReviewActions};
pub use theme_provider::{DefaultTheme, ThemeProvider};
