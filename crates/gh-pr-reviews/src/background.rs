//! Background worker thread that processes actions through middleware
//!
//! - Main thread handles rendering, user input and reducers
//! - Background thread runs the middleware chain (API calls, git, editors)
//! - Communication happens via channels
//!
//! Actions dispatched by middleware via Dispatcher re-enter the middleware chain,
//! enabling flows like Event::ClientReady -> Event::Panel(Refresh).

use crate::actions::{Action, GlobalAction};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, RwLock};
use std::thread;

/// Shared state that background can read (main thread writes via reducer)
pub type SharedState = Arc<RwLock<AppState>>;

/// Spawn the background worker thread
///
/// - `action_rx`: receives actions from main thread and from Dispatcher (re-entry)
/// - `action_tx`: used to create Dispatcher for middleware to dispatch actions that re-enter
/// - `result_tx`: sends actions to main thread for reducers (non-consumed actions)
/// - `state`: shared state for middleware to read
/// - `middleware`: the middleware chain
pub fn spawn_background_worker(
    action_rx: Receiver<Action>,
    action_tx: Sender<Action>,
    result_tx: Sender<Action>,
    state: SharedState,
    middleware: Vec<Box<dyn Middleware + Send>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        background_loop(action_rx, action_tx, result_tx, state, middleware);
    })
}

fn background_loop(
    action_rx: Receiver<Action>,
    action_tx: Sender<Action>,
    result_tx: Sender<Action>,
    state: SharedState,
    mut middleware: Vec<Box<dyn Middleware + Send>>,
) {
    log::info!("Background worker started");

    let dispatcher = Dispatcher::new(action_tx);

    while let Ok(action) = action_rx.recv() {
        if matches!(action, Action::Global(GlobalAction::Quit)) {
            log::info!("Background worker received shutdown signal");
            if result_tx.send(action).is_err() {
                log::error!("Failed to send quit action to main thread");
            }
            break;
        }

        let current_state = match state.read() {
            Ok(s) => s.clone(),
            Err(e) => {
                log::error!("Failed to read shared state: {}", e);
                continue;
            }
        };

        if !run_chain(&mut middleware, &action, &current_state, &dispatcher) {
            continue;
        }

        // Events are only for middleware observation
        if !matches!(action, Action::Event(_)) && result_tx.send(action).is_err() {
            log::error!("Result channel disconnected, shutting down");
            break;
        }
    }

    log::info!("Background worker stopped");
}

/// Run one action through the chain. False if some middleware consumed it.
fn run_chain(
    middleware: &mut [Box<dyn Middleware + Send>],
    action: &Action,
    state: &AppState,
    dispatcher: &Dispatcher,
) -> bool {
    middleware
        .iter_mut()
        .all(|mw| mw.handle(action, state, dispatcher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ReviewsPanelAction;
    use std::sync::mpsc;
    use std::time::Duration;

    /// Consumes DismissError, passes everything else
    struct SwallowDismiss;

    impl Middleware for SwallowDismiss {
        fn handle(&mut self, action: &Action, _: &AppState, _: &Dispatcher) -> bool {
            !matches!(action, Action::Reviews(ReviewsPanelAction::DismissError))
        }
    }

    #[test]
    fn test_worker_forwards_unconsumed_actions_and_stops_on_quit() {
        let (action_tx, action_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let state = Arc::new(RwLock::new(AppState::for_tests()));

        let handle = spawn_background_worker(
            action_rx,
            action_tx.clone(),
            result_tx,
            state,
            vec![Box::new(SwallowDismiss)],
        );

        action_tx
            .send(Action::Reviews(ReviewsPanelAction::DismissError))
            .unwrap();
        action_tx
            .send(Action::event(crate::actions::Event::Started))
            .unwrap();
        action_tx
            .send(Action::Reviews(ReviewsPanelAction::LoadStart))
            .unwrap();
        action_tx.send(Action::Global(GlobalAction::Quit)).unwrap();

        let first = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(
            first,
            Action::Reviews(ReviewsPanelAction::LoadStart)
        ));
        let second = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(second, Action::Global(GlobalAction::Quit)));

        handle.join().unwrap();
    }
}
