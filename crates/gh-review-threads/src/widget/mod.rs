//! Ratatui widgets for the reviews panel.

mod reviews_panel;

pub use reviews_panel::{FooterHint, ReviewsPanel};
