//! KeyboardMiddleware - translates key presses into panel actions
//!
//! Two layers:
//!
//! ## Layer 1: Priority keys
//! Ctrl+C always quits.
//!
//! ## Layer 2: Mode
//! While a reply is being edited, printable keys go into the draft. Otherwise
//! keys map to navigation and thread commands.

use crate::actions::{Action, GlobalAction, ReviewsPanelAction};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use gh_review_threads::ReviewsAction;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyboardMiddleware;

impl KeyboardMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for KeyboardMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        let Action::Global(GlobalAction::KeyPressed(key)) = action else {
            return true;
        };

        match map_key(*key, state) {
            Some(mapped) => dispatcher.dispatch(mapped),
            None => log::trace!("Unbound key {:?}", key),
        }

        // Raw key presses never reach reducers
        false
    }
}

/// Map a key press to an action for the current state
pub fn map_key(key: KeyEvent, state: &AppState) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Global(GlobalAction::Quit));
    }

    if state.reviews.panel.editing().is_some() {
        return map_reply_key(key).map(Action::panel);
    }

    map_normal_key(key, state)
}

fn map_reply_key(key: KeyEvent) -> Option<ReviewsAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Esc => ReviewsAction::CancelReply,
        KeyCode::Char('s') if ctrl => ReviewsAction::SubmitReply,
        KeyCode::Enter if ctrl || alt => ReviewsAction::SubmitReply,
        KeyCode::Enter => ReviewsAction::ReplyNewline,
        KeyCode::Backspace => ReviewsAction::ReplyBackspace,
        KeyCode::Delete => ReviewsAction::ReplyDelete,
        KeyCode::Left => ReviewsAction::ReplyCursorLeft,
        KeyCode::Right => ReviewsAction::ReplyCursorRight,
        KeyCode::Home => ReviewsAction::ReplyCursorHome,
        KeyCode::End => ReviewsAction::ReplyCursorEnd,
        KeyCode::Char(c) if !ctrl && !alt => ReviewsAction::ReplyInsertChar(c),
        _ => return None,
    };
    Some(action)
}

fn map_normal_key(key: KeyEvent, state: &AppState) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let action = match key.code {
        KeyCode::Esc => {
            // Peel one layer per press: error, highlight, then the panel
            if state.reviews.panel.error().is_some() {
                return Some(Action::Reviews(ReviewsPanelAction::DismissError));
            }
            if state.reviews.panel.highlighted().is_some() {
                ReviewsAction::ClearHighlight
            } else {
                ReviewsAction::Close
            }
        }
        KeyCode::Char('q') => ReviewsAction::Close,
        KeyCode::Char('r') if ctrl => ReviewsAction::Refresh,
        KeyCode::F(5) => ReviewsAction::Refresh,

        // Navigation
        KeyCode::Down | KeyCode::Char('j') => ReviewsAction::CursorDown,
        KeyCode::Up | KeyCode::Char('k') => ReviewsAction::CursorUp,
        KeyCode::Home | KeyCode::Char('g') => ReviewsAction::CursorFirst,
        KeyCode::End | KeyCode::Char('G') => ReviewsAction::CursorLast,
        KeyCode::Char('n') | KeyCode::Char(']') => ReviewsAction::NextThread,
        KeyCode::Char('N') | KeyCode::Char('[') => ReviewsAction::PrevThread,

        // Open/closed state
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Tab => ReviewsAction::ToggleAtCursor,
        KeyCode::Char('e') => ReviewsAction::ExpandAll,
        KeyCode::Char('E') => ReviewsAction::CollapseAll,

        // Thread actions
        KeyCode::Char('r') => ReviewsAction::StartReply,
        KeyCode::Char('R') => ReviewsAction::ToggleResolveAtCursor,
        KeyCode::Char('o') => ReviewsAction::OpenFileAtCursor,
        KeyCode::Char('d') => ReviewsAction::OpenDiffAtCursor,
        KeyCode::Char('l') => ReviewsAction::OpenLinkAtCursor,
        KeyCode::Char('O') => ReviewsAction::OpenPermalinkAtCursor,

        _ => return None,
    };
    Some(Action::panel(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_review_threads::ReviewsEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn panel_action(action: Option<Action>) -> Option<ReviewsAction> {
        match action {
            Some(Action::Reviews(ReviewsPanelAction::Panel(action))) => Some(action),
            _ => None,
        }
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let state = AppState::for_tests();
        assert!(matches!(
            map_key(ctrl('c'), &state),
            Some(Action::Global(GlobalAction::Quit))
        ));
    }

    #[test]
    fn test_normal_mode_keys() {
        let state = AppState::for_tests();
        assert_eq!(
            panel_action(map_key(key(KeyCode::Char('j')), &state)),
            Some(ReviewsAction::CursorDown)
        );
        assert_eq!(
            panel_action(map_key(key(KeyCode::Char('r')), &state)),
            Some(ReviewsAction::StartReply)
        );
        assert_eq!(
            panel_action(map_key(ctrl('r'), &state)),
            Some(ReviewsAction::Refresh)
        );
        assert_eq!(
            panel_action(map_key(key(KeyCode::Esc), &state)),
            Some(ReviewsAction::Close)
        );
        assert!(map_key(key(KeyCode::Char('z')), &state).is_none());
    }

    #[test]
    fn test_esc_dismisses_error_first() {
        let mut state = AppState::for_tests();
        state.reviews.panel.set_error("Failed to load reviews: boom");
        assert!(matches!(
            map_key(key(KeyCode::Esc), &state),
            Some(Action::Reviews(ReviewsPanelAction::DismissError))
        ));
    }

    #[test]
    fn test_editing_mode_routes_text_to_draft() {
        let mut state = AppState::for_tests();
        state.reviews.panel.set_data(crate::test_support::review_data());
        state
            .reviews
            .panel
            .handle_action(ReviewsAction::HighlightThread("T1".to_string()));
        assert_eq!(
            state.reviews.panel.handle_action(ReviewsAction::StartReply),
            Vec::<ReviewsEvent>::new()
        );
        assert!(state.reviews.panel.editing().is_some());

        assert_eq!(
            panel_action(map_key(key(KeyCode::Char('q')), &state)),
            Some(ReviewsAction::ReplyInsertChar('q'))
        );
        assert_eq!(
            panel_action(map_key(key(KeyCode::Enter), &state)),
            Some(ReviewsAction::ReplyNewline)
        );
        assert_eq!(
            panel_action(map_key(ctrl('s'), &state)),
            Some(ReviewsAction::SubmitReply)
        );
        assert_eq!(
            panel_action(map_key(key(KeyCode::Esc), &state)),
            Some(ReviewsAction::CancelReply)
        );
    }
}
