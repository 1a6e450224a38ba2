//! Opens files in the configured editor and links in the browser

use crate::actions::{Action, Event};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use crate::utils::browser::{diff_url, open_url};
use gh_pr_config::AppConfig;
use gh_review_threads::ReviewsEvent;
use std::path::Path;
use tokio::runtime::Handle;

pub struct EditorMiddleware {
    runtime: Handle,
}

impl EditorMiddleware {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    fn open_file(&self, state: &AppState, path: &str, line: u32) {
        let (program, args) = editor_invocation(&state.app_config, &state.target.workdir, path, line);
        let workdir = state.target.workdir.clone();

        self.runtime.spawn(async move {
            match tokio::process::Command::new(&program)
                .args(&args)
                .current_dir(&workdir)
                .spawn()
            {
                Ok(_) => log::info!("Opened {} with {}", args.join(" "), program),
                Err(e) => log::error!("Failed to start editor '{}': {}", program, e),
            }
        });
    }

    fn open_in_browser(&self, url: String) {
        self.runtime.spawn(open_url(url));
    }
}

/// Program and arguments to open `path` at `line`
pub fn editor_invocation(
    config: &AppConfig,
    workdir: &Path,
    path: &str,
    line: u32,
) -> (String, Vec<String>) {
    let full_path = workdir.join(path);
    let args = config.editor_args(&full_path.to_string_lossy(), line);
    (config.editor_command.clone(), args)
}

impl Middleware for EditorMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, _dispatcher: &Dispatcher) -> bool {
        let Action::Event(Event::Panel(event)) = action else {
            return true;
        };

        match event {
            ReviewsEvent::OpenFile { path, line } => self.open_file(state, path, *line),
            ReviewsEvent::OpenDiff { path, position } => {
                let pr_url = state
                    .reviews
                    .url
                    .clone()
                    .unwrap_or_else(|| state.target.url());
                log::debug!("Opening diff of {} at position {}", path, position);
                self.open_in_browser(diff_url(&pr_url, path));
            }
            ReviewsEvent::OpenIssueish(link) => self.open_in_browser(link.url()),
            ReviewsEvent::OpenUrl(url) => self.open_in_browser(url.clone()),
            _ => {}
        }

        true
    }
}
