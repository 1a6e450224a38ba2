use crate::actions::{Action, GlobalAction};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for LoggingMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, _dispatcher: &Dispatcher) -> bool {
        match action {
            // Loaded data is large; the reducer logs what matters
            Action::Reviews(crate::actions::ReviewsPanelAction::Loaded(loaded)) => {
                log::debug!(
                    "Action: Loaded({} reviews, {} threads)",
                    loaded.data.summaries.len(),
                    loaded.data.threads.len()
                );
            }
            Action::Global(GlobalAction::KeyPressed(key)) => {
                log::trace!("Action: KeyPressed({:?})", key);
            }
            _ => log::debug!("Action: {:?}", action),
        }

        true // Always pass action through
    }
}
