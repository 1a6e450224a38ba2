//! Working copy queries through the git CLI
//!
//! Used to decide whether the pull request is checked out and to build the
//! per-file translation tables from head and working contents.

use anyhow::{bail, Context, Result};
use gh_review_threads::{CommentTranslationTable, CommentTranslations, PullRequestDiff};
use std::path::Path;
use tokio::process::Command;

async fn run_git(workdir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .await
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("git output is not valid UTF-8")
}

/// Commit currently checked out in `workdir`
pub async fn head_sha(workdir: &Path) -> Result<String> {
    Ok(run_git(workdir, &["rev-parse", "HEAD"]).await?.trim().to_string())
}

/// Whether the working copy is at the pull request's head commit
pub async fn is_checked_out(workdir: &Path, pr_head_sha: &str) -> bool {
    match head_sha(workdir).await {
        Ok(sha) => sha == pr_head_sha,
        Err(e) => {
            log::debug!("No usable working copy at {}: {:#}", workdir.display(), e);
            false
        }
    }
}

/// Contents of `path` at `rev`, if the commit is available locally
pub async fn show_file(workdir: &Path, rev: &str, path: &str) -> Option<String> {
    let object = format!("{rev}:{path}");
    match run_git(workdir, &["show", &object]).await {
        Ok(contents) => Some(contents),
        Err(e) => {
            log::debug!("Cannot read {}: {:#}", object, e);
            None
        }
    }
}

/// Build translation tables for every file of the diff
///
/// Head contents come from git so each table carries their digest. When the
/// pull request is checked out, edits in the working copy are folded in.
pub async fn build_translations(
    workdir: &Path,
    diff: &PullRequestDiff,
    is_checked_out: bool,
) -> CommentTranslations {
    let mut translations = CommentTranslations::new();

    for file in &diff.files {
        let head = show_file(workdir, &diff.head_sha, &file.path).await;
        let mut table = CommentTranslationTable::from_file_diff(file, head.as_deref());

        if let (true, Some(head)) = (is_checked_out, head.as_deref()) {
            match tokio::fs::read_to_string(workdir.join(&file.path)).await {
                Ok(working) if working != head => {
                    log::debug!("{} has local edits", file.path);
                    table.apply_local_edits(head, &working);
                }
                Ok(_) => {}
                Err(e) => log::debug!("Cannot read working copy of {}: {}", file.path, e),
            }
        }

        translations.insert(file.path.clone(), table);
    }

    log::debug!("Built {} translation tables", translations.len());
    translations
}
