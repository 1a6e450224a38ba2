use anyhow::Context;
use clap::Parser;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event as TermEvent, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

mod actions;
mod background;
mod cli;
mod dispatcher;
mod git;
mod logger;
mod middleware;
mod reducer;
mod reducers;
mod state;
mod store;
mod theme;
mod utils;
mod view_models;
mod views;

#[cfg(test)]
mod test_support;

use actions::{Action, Event, GlobalAction};
use background::spawn_background_worker;
use cli::{Cli, PullRequestTarget};
use gh_pr_config::AppConfig;
use middleware::{
    editor::EditorMiddleware, github::GitHubMiddleware, keyboard::KeyboardMiddleware,
    logging::LoggingMiddleware, panel_events::PanelEventsMiddleware, Middleware,
};
use state::AppState;
use store::Store;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let target = PullRequestTarget::try_from(cli)?;

    // Tokens may come from a .env file
    dotenvy::dotenv().ok();

    let log_file = logger::init()?;
    log::info!("Starting gh-pr-reviews for {}", target);

    let app_config = AppConfig::load();
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let mut store = Store::new(AppState::new(target, app_config));

    // Action channel feeds the middleware chain; results go to the reducer
    let (action_tx, action_rx) = mpsc::channel::<Action>();
    let (result_tx, result_rx) = mpsc::channel::<Action>();

    // Middleware executes in this order
    let middleware: Vec<Box<dyn Middleware + Send>> = vec![
        Box::new(LoggingMiddleware::new()),
        Box::new(KeyboardMiddleware::new()),
        Box::new(PanelEventsMiddleware::new()),
        Box::new(EditorMiddleware::new(runtime.handle().clone())),
        Box::new(GitHubMiddleware::new(runtime.handle().clone())),
    ];
    let worker = spawn_background_worker(
        action_rx,
        action_tx.clone(),
        result_tx,
        store.shared_state(),
        middleware,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut store, &action_tx, &result_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Stop the worker if the loop ended on an error
    if store.state().running {
        action_tx.send(Action::Global(GlobalAction::Quit)).ok();
    }
    if worker.join().is_err() {
        log::error!("Background worker panicked");
    }
    runtime.shutdown_timeout(Duration::from_secs(1));

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
        eprintln!("Error: {:#}", err);
        eprintln!("Log file: {}", log_file.display());
    }

    log::info!("Exiting gh-pr-reviews");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut Store,
    action_tx: &Sender<Action>,
    result_rx: &Receiver<Action>,
) -> anyhow::Result<()> {
    let size = terminal.size()?;
    send(
        action_tx,
        Action::Global(GlobalAction::Resize {
            width: size.width,
            height: size.height,
        }),
    );
    send(action_tx, Action::event(Event::Started));

    loop {
        // Apply everything middleware has let through
        while let Ok(action) = result_rx.try_recv() {
            for event in store.reduce(&action) {
                send(action_tx, Action::event(Event::Panel(event)));
            }
        }

        if !store.state().running {
            break;
        }

        terminal.draw(|frame| {
            let area = frame.area();
            views::render(store.state(), area, frame);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                // Only process key press events (ignore key release)
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    send(action_tx, Action::Global(GlobalAction::KeyPressed(key)));
                }
                TermEvent::Resize(width, height) => {
                    send(action_tx, Action::Global(GlobalAction::Resize { width, height }));
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn send(action_tx: &Sender<Action>, action: Action) {
    if let Err(e) = action_tx.send(action) {
        log::error!("Failed to send action to background worker: {}", e);
    }
}
