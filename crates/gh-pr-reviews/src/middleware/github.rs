//! GitHub Operations Middleware
//!
//! Central middleware for all GitHub API interactions:
//! - Client initialization (on Event::Started)
//! - Fetching reviews and the diff (on refresh)
//! - Posting replies and resolving threads
//! - Periodic refresh

use crate::actions::{Action, Event, LoadedReviews, ReviewsPanelAction};
use crate::cli::PullRequestTarget;
use crate::dispatcher::Dispatcher;
use crate::git;
use crate::middleware::Middleware;
use crate::state::AppState;
use anyhow::Context;
use gh_client::{ClientManager, GitHubClient};
use gh_review_threads::github::{review_data, GitHubReviewActions};
use gh_review_threads::model::ThreadId;
use gh_review_threads::{
    parse_unified_diff, ReplyRequest, ReviewActionError, ReviewActions, ReviewsEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Mutex as TokioMutex;
use tokio::task::JoinHandle;

/// Middleware for all GitHub API operations
pub struct GitHubMiddleware {
    runtime: Handle,
    /// Client manager for multi-host support
    client_manager: Arc<TokioMutex<ClientManager>>,
    auto_refresh: Option<JoinHandle<()>>,
}

impl GitHubMiddleware {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            client_manager: Arc::new(TokioMutex::new(ClientManager::new())),
            auto_refresh: None,
        }
    }

    /// Initialize the GitHub client for the target host (async, non-blocking)
    fn initialize_client(&self, state: &AppState, dispatcher: &Dispatcher) {
        let client_manager = Arc::clone(&self.client_manager);
        let host = state.target.client_host().map(str::to_string);
        let dispatcher = dispatcher.clone();

        self.runtime.spawn(async move {
            let mut manager = client_manager.lock().await;
            match manager.get_client(host.as_deref()).await {
                Ok(_) => {
                    log::info!(
                        "GitHubMiddleware: client initialized for {}",
                        host.as_deref().unwrap_or(gh_client::DEFAULT_HOST)
                    );
                    dispatcher.dispatch(Action::event(Event::ClientReady));
                }
                Err(e) => {
                    log::error!("GitHubMiddleware: client not initialized: {:#}", e);
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::LoadError(format!(
                        "{e:#}"
                    ))));
                }
            }
        });
    }

    /// Start a fetch unless one is already outstanding
    fn refresh(&self, state: &AppState, dispatcher: &Dispatcher) {
        let Some(subscription) = state.reviews.panel.refresh_guard().try_begin() else {
            log::debug!("GitHubMiddleware: refresh already in flight");
            return;
        };

        dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::LoadStart));

        let client_manager = Arc::clone(&self.client_manager);
        let target = state.target.clone();
        let dispatcher = dispatcher.clone();

        self.runtime.spawn(async move {
            // Released once the result has been handed to the reducer
            let _subscription = subscription;

            match load_reviews(&client_manager, &target).await {
                Ok(loaded) => {
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::Loaded(Box::new(
                        loaded,
                    ))));
                }
                Err(e) => {
                    log::error!("Failed to load reviews for {}: {:#}", target, e);
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::LoadError(format!(
                        "{e:#}"
                    ))));
                }
            }
        });
    }

    fn submit_reply(&self, request: &ReplyRequest, state: &AppState, dispatcher: &Dispatcher) {
        let thread_id = request.thread_id.clone();
        let Some(context) = state.reviews.context.clone() else {
            dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::ReplyFailed {
                thread_id,
                error: "reviews are not loaded yet".to_string(),
            }));
            return;
        };

        let client_manager = Arc::clone(&self.client_manager);
        let host = state.target.client_host().map(str::to_string);
        let request = request.clone();
        let dispatcher = dispatcher.clone();

        self.runtime.spawn(async move {
            let result = match client(&client_manager, host.as_deref()).await {
                Ok(client) => GitHubReviewActions::new(client, context)
                    .post_reply(request)
                    .await
                    .map(|_| ()),
                Err(e) => Err(ReviewActionError::Unavailable(format!("{e:#}"))),
            };

            match result {
                Ok(()) => {
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::ReplySucceeded {
                        thread_id,
                    }));
                    dispatcher.dispatch(Action::event(Event::Panel(ReviewsEvent::Refresh)));
                }
                Err(e) => {
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::ReplyFailed {
                        thread_id,
                        error: reply_error_message(e),
                    }));
                }
            }
        });
    }

    fn set_resolved(
        &self,
        thread_id: &ThreadId,
        resolve: bool,
        state: &AppState,
        dispatcher: &Dispatcher,
    ) {
        let client_manager = Arc::clone(&self.client_manager);
        let host = state.target.client_host().map(str::to_string);
        let context = state.reviews.context.clone().unwrap_or_default();
        let thread_id = thread_id.clone();
        let dispatcher = dispatcher.clone();

        self.runtime.spawn(async move {
            let result = match client(&client_manager, host.as_deref()).await {
                Ok(client) => {
                    let actions = GitHubReviewActions::new(client, context);
                    if resolve {
                        actions.resolve_thread(&thread_id).await
                    } else {
                        actions.unresolve_thread(&thread_id).await
                    }
                }
                Err(e) => Err(ReviewActionError::Unavailable(format!("{e:#}"))),
            };

            match result {
                Ok(()) => {
                    dispatcher.dispatch(Action::event(Event::Panel(ReviewsEvent::Refresh)));
                }
                Err(e) => {
                    log::error!("{}", e);
                    dispatcher.dispatch(Action::Reviews(ReviewsPanelAction::MutationFailed(
                        e.to_string(),
                    )));
                }
            }
        });
    }

    fn start_auto_refresh(&mut self, state: &AppState, dispatcher: &Dispatcher) {
        let secs = state.app_config.auto_refresh_secs;
        if secs == 0 || self.auto_refresh.is_some() {
            return;
        }

        log::info!("Refreshing reviews every {}s", secs);
        let dispatcher = dispatcher.clone();
        self.auto_refresh = Some(self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                dispatcher.dispatch(Action::event(Event::Panel(ReviewsEvent::Refresh)));
            }
        }));
    }
}

impl Drop for GitHubMiddleware {
    fn drop(&mut self) {
        if let Some(task) = self.auto_refresh.take() {
            task.abort();
        }
    }
}

impl Middleware for GitHubMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Event(Event::Started) => self.initialize_client(state, dispatcher),
            Action::Event(Event::ClientReady) => {
                self.refresh(state, dispatcher);
                self.start_auto_refresh(state, dispatcher);
            }
            Action::Event(Event::Panel(event)) => match event {
                ReviewsEvent::Refresh => self.refresh(state, dispatcher),
                ReviewsEvent::SubmitReply(request) => {
                    self.submit_reply(request, state, dispatcher)
                }
                ReviewsEvent::ResolveThread { thread_id } => {
                    self.set_resolved(thread_id, true, state, dispatcher)
                }
                ReviewsEvent::UnresolveThread { thread_id } => {
                    self.set_resolved(thread_id, false, state, dispatcher)
                }
                _ => {}
            },
            _ => {}
        }

        true
    }
}

async fn client(
    client_manager: &TokioMutex<ClientManager>,
    host: Option<&str>,
) -> anyhow::Result<Arc<dyn GitHubClient>> {
    let client = client_manager.lock().await.get_client(host).await?;
    Ok(Arc::new(client))
}

/// Fetch reviews and diff, then compute translation tables against the working copy
async fn load_reviews(
    client_manager: &TokioMutex<ClientManager>,
    target: &PullRequestTarget,
) -> anyhow::Result<LoadedReviews> {
    let client = client(client_manager, target.client_host()).await?;

    let (reviews, diff_text) = tokio::try_join!(
        client.fetch_reviews(&target.owner, &target.repo, target.number),
        client.fetch_diff(&target.owner, &target.repo, target.number),
    )?;

    let diff = parse_unified_diff(&diff_text, &reviews.base_sha, &reviews.head_sha)
        .context("Failed to parse pull request diff")?;

    let is_checked_out = git::is_checked_out(&target.workdir, &reviews.head_sha).await;
    let translations = git::build_translations(&target.workdir, &diff, is_checked_out).await;
    log::info!(
        "Loaded {} (checked out: {}, {} files)",
        target,
        is_checked_out,
        diff.files.len()
    );

    let title = reviews.title.clone();
    let url = reviews.url.clone();
    let context = reviews.review_context();
    Ok(LoadedReviews {
        data: review_data(reviews, Some(translations), Some(diff), is_checked_out),
        title,
        url,
        context,
    })
}

/// The panel prefixes its own "Failed to post reply" text
fn reply_error_message(error: ReviewActionError) -> String {
    match error {
        ReviewActionError::PostFailed(message) => message,
        other => other.to_string(),
    }
}
