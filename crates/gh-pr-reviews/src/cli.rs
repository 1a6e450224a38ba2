//! Command line arguments

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Review threads of a GitHub pull request in the terminal
#[derive(Debug, Parser)]
#[command(name = "gh-pr-reviews", version, about)]
pub struct Cli {
    /// Repository as owner/repo
    pub repository: String,

    /// Pull request number
    pub number: u64,

    /// GitHub host (for GitHub Enterprise)
    #[arg(long, default_value = gh_client::DEFAULT_HOST)]
    pub host: String,

    /// Working copy used for line translation and opening files
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,
}

/// The pull request the app is pointed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub host: String,
    pub workdir: PathBuf,
}

impl PullRequestTarget {
    /// Host to pass to the client manager (None for github.com)
    pub fn client_host(&self) -> Option<&str> {
        (self.host != gh_client::DEFAULT_HOST).then_some(self.host.as_str())
    }

    pub fn url(&self) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            self.host, self.owner, self.repo, self.number
        )
    }
}

impl std::fmt::Display for PullRequestTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

impl TryFrom<Cli> for PullRequestTarget {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let Some((owner, repo)) = cli.repository.split_once('/') else {
            bail!("Expected owner/repo, got '{}'", cli.repository);
        };
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            bail!("Expected owner/repo, got '{}'", cli.repository);
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: cli.number,
            host: cli.host,
            workdir: cli.workdir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gh-pr-reviews").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_target() {
        let target = PullRequestTarget::try_from(cli(&["rust-lang/rust", "42"])).unwrap();
        assert_eq!(target.owner, "rust-lang");
        assert_eq!(target.repo, "rust");
        assert_eq!(target.number, 42);
        assert_eq!(target.client_host(), None);
        assert_eq!(target.url(), "https://github.com/rust-lang/rust/pull/42");
        assert_eq!(target.to_string(), "rust-lang/rust#42");
    }

    #[test]
    fn test_enterprise_host() {
        let target =
            PullRequestTarget::try_from(cli(&["o/r", "1", "--host", "ghe.example.com"])).unwrap();
        assert_eq!(target.client_host(), Some("ghe.example.com"));
    }

    #[test]
    fn test_rejects_bad_repository() {
        assert!(PullRequestTarget::try_from(cli(&["rust", "1"])).is_err());
        assert!(PullRequestTarget::try_from(cli(&["a/b/c", "1"])).is_err());
    }
}
