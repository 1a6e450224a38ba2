//! Reacts to panel events that only concern the app shell

use crate::actions::{Action, Event, GlobalAction};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use gh_review_threads::ReviewsEvent;

pub struct PanelEventsMiddleware;

impl PanelEventsMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for PanelEventsMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, dispatcher: &Dispatcher) -> bool {
        let Action::Event(Event::Panel(event)) = action else {
            return true;
        };

        match event {
            ReviewsEvent::Close => {
                log::info!("Reviews panel closed");
                dispatcher.dispatch(Action::Global(GlobalAction::Quit));
            }
            ReviewsEvent::SectionToggled { section, open } => {
                log::debug!("Section {} {}", section.title(), if *open { "expanded" } else { "collapsed" });
            }
            ReviewsEvent::ThreadToggled { thread_id, open } => {
                log::debug!("Thread {} {}", thread_id, if *open { "expanded" } else { "collapsed" });
            }
            _ => {}
        }

        true
    }
}
