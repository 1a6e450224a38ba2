//! Application state

use crate::cli::PullRequestTarget;
use crate::theme::Theme;
use gh_client::ReviewContext;
use gh_pr_config::AppConfig;
use gh_review_threads::{ReviewsEvent, ReviewsPanelState};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub running: bool,
    /// The pull request being reviewed
    pub target: PullRequestTarget,
    pub reviews: ReviewsState,
    pub theme: Theme,
    pub app_config: AppConfig,
}

impl AppState {
    pub fn new(target: PullRequestTarget, app_config: AppConfig) -> Self {
        Self {
            running: true,
            target,
            reviews: ReviewsState::new(app_config.collapse_resolved),
            theme: Theme::default(),
            app_config,
        }
    }
}

/// State of the reviews screen
#[derive(Debug, Clone)]
pub struct ReviewsState {
    /// The panel itself
    pub panel: ReviewsPanelState,
    /// PR title once loaded
    pub title: Option<String>,
    /// PR URL once loaded
    pub url: Option<String>,
    /// Identifiers for posting replies, from the last fetch
    pub context: Option<ReviewContext>,
    /// A fetch is in flight
    pub loading: bool,
    /// When the last fetch finished
    pub last_loaded: Option<chrono::DateTime<chrono::Local>>,
    /// Events emitted by the panel, drained by the main loop into the middleware chain
    pub outbox: Vec<ReviewsEvent>,
}

impl ReviewsState {
    pub fn new(collapse_resolved: bool) -> Self {
        Self {
            panel: ReviewsPanelState::new(collapse_resolved),
            title: None,
            url: None,
            context: None,
            loading: false,
            last_loaded: None,
            outbox: Vec::new(),
        }
    }
}

impl Default for ReviewsState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
impl AppState {
    /// State for octo/repo#7 with default config
    pub(crate) fn for_tests() -> Self {
        let target = PullRequestTarget {
            owner: "octo".to_string(),
            repo: "repo".to_string(),
            number: 7,
            host: gh_client::DEFAULT_HOST.to_string(),
            workdir: std::path::PathBuf::from("."),
        };
        Self::new(target, AppConfig::default())
    }
}
