//! Links to issues and pull requests found in comment bodies.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static ISSUEISH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://github\.com/([A-Za-z0-9][A-Za-z0-9-]*)/([A-Za-z0-9._-]+)/(issues|pull|pulls)/(\d+)",
    )
    .expect("issueish pattern is valid")
});

/// Whether a link points at an issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueishKind {
    Issue,
    PullRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueishError {
    #[error("Not an issue or pull request URL: {0}")]
    NotIssueish(String),
}

/// An issue or pull request reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueishLink {
    pub owner: String,
    pub repo: String,
    pub kind: IssueishKind,
    pub number: u64,
}

impl IssueishLink {
    /// Parse a single URL of the form `https://github.com/{owner}/{repo}/{issues|pull|pulls}/{number}`.
    pub fn parse(url: &str) -> Result<Self, IssueishError> {
        let captures = ISSUEISH_URL
            .captures(url.trim())
            .filter(|c| c.get(0).is_some_and(|m| m.start() == 0))
            .ok_or_else(|| IssueishError::NotIssueish(url.to_string()))?;
        Self::from_captures(&captures).ok_or_else(|| IssueishError::NotIssueish(url.to_string()))
    }

    /// Every issueish link in `text`, in order, without duplicates.
    pub fn find_all(text: &str) -> Vec<Self> {
        let mut links: Vec<Self> = Vec::new();
        for captures in ISSUEISH_URL.captures_iter(text) {
            if let Some(link) = Self::from_captures(&captures) {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
        links
    }

    fn from_captures(captures: &regex::Captures<'_>) -> Option<Self> {
        let kind = match captures.get(3)?.as_str() {
            "issues" => IssueishKind::Issue,
            _ => IssueishKind::PullRequest,
        };
        Some(Self {
            owner: captures.get(1)?.as_str().to_string(),
            repo: captures.get(2)?.as_str().to_string(),
            kind,
            number: captures.get(4)?.as_str().parse().ok()?,
        })
    }

    /// Canonical web URL.
    pub fn url(&self) -> String {
        let segment = match self.kind {
            IssueishKind::Issue => "issues",
            IssueishKind::PullRequest => "pull",
        };
        format!(
            "https://github.com/{}/{}/{}/{}",
            self.owner, self.repo, segment, self.number
        )
    }
}

impl fmt::Display for IssueishLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
