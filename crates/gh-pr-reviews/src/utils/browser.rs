//! Browser utilities
//!
//! Functions for opening URLs in the system's default browser.

use sha2::{Digest, Sha256};

/// Open a URL in the system's default browser
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Linux: `xdg-open`
/// - Windows: `cmd /C start`
pub async fn open_url(url: String) {
    #[cfg(target_os = "macos")]
    let result = tokio::process::Command::new("open").arg(&url).spawn();

    #[cfg(target_os = "linux")]
    let result = tokio::process::Command::new("xdg-open").arg(&url).spawn();

    #[cfg(target_os = "windows")]
    let result = tokio::process::Command::new("cmd")
        .args(["/C", "start", &url])
        .spawn();

    match result {
        Ok(_) => log::info!("Opened {} in browser", url),
        Err(e) => log::error!("Failed to open URL in browser: {}", e),
    }
}

/// Link to a file in the pull request's "Files changed" tab
///
/// GitHub anchors each file by the SHA-256 of its path.
pub fn diff_url(pr_url: &str, path: &str) -> String {
    let anchor = format!("{:x}", Sha256::digest(path.as_bytes()));
    format!("{}/files#diff-{}", pr_url.trim_end_matches('/'), anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_url_anchors_by_path_digest() {
        let url = diff_url("https://github.com/octo/repo/pull/7/", "src/lib.rs");
        assert!(url.starts_with("https://github.com/octo/repo/pull/7/files#diff-"));
        let anchor = url.rsplit("diff-").next().unwrap();
        assert_eq!(anchor.len(), 64);
        assert_ne!(url, diff_url("https://github.com/octo/repo/pull/7", "src/main.rs"));
    }
}
