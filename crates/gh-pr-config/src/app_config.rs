//! Application configuration
//!
//! Configuration loaded from .gh-pr-reviews.toml.

use serde::{Deserialize, Serialize};

/// Application configuration loaded from .gh-pr-reviews.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Command used to open files at a line (e.g., "code", "zed", "vim")
    #[serde(default = "default_editor_command")]
    pub editor_command: String,

    /// Arguments passed to the editor; `{path}` and `{line}` are substituted
    #[serde(default = "default_editor_goto_args")]
    pub editor_goto_args: Vec<String>,

    /// Diff lines previewed above each open thread (0 disables the preview)
    #[serde(default = "default_diff_context_lines")]
    pub diff_context_lines: usize,

    /// Refresh interval in seconds (0 disables auto refresh)
    #[serde(default)]
    pub auto_refresh_secs: u64,

    /// Start resolved threads collapsed
    #[serde(default = "default_collapse_resolved")]
    pub collapse_resolved: bool,
}

fn default_editor_command() -> String {
    "code".to_string() // Default to VS Code
}

fn default_editor_goto_args() -> Vec<String> {
    vec!["--goto".to_string(), "{path}:{line}".to_string()]
}

fn default_diff_context_lines() -> usize {
    4
}

fn default_collapse_resolved() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor_command: default_editor_command(),
            editor_goto_args: default_editor_goto_args(),
            diff_context_lines: default_diff_context_lines(),
            auto_refresh_secs: 0,
            collapse_resolved: default_collapse_resolved(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Editor arguments for opening `path` at `line`
    pub fn editor_args(&self, path: &str, line: u32) -> Vec<String> {
        let line = line.to_string();
        self.editor_goto_args
            .iter()
            .map(|arg| arg.replace("{path}", path).replace("{line}", &line))
            .collect()
    }
}
