//! State management for the reviews panel.

mod panel_state;
mod refresh;
mod reply_draft;

pub use panel_state::{PendingReply, ReviewData, ReviewsPanelState, Row, Section};
pub use refresh::{RefreshGuard, RefreshSubscription};
pub use reply_draft::{ReplyDraft, ReplyDrafts};
