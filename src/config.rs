// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for codenav
//!
//! Loads configuration from .codenavrc.toml in the current directory or
//! ~/.config/codenav/config.toml

use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Server queried when neither the CLI nor the config names one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:7878";

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration loaded from .codenavrc.toml or ~/.config/codenav/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the code search server
    pub server_url: Option<String>,
    /// Maximum number of completion hits per query
    pub complete_limit: Option<usize>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .codenavrc.toml in current directory
    /// 2. ~/.config/codenav/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(&PathBuf::from(".codenavrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("codenav").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format
            .as_ref()
            .and_then(|s| match s.to_lowercase().as_str() {
                "json" => Some(ConfigOutputFormat::Json),
                "text" => Some(ConfigOutputFormat::Text),
                _ => None,
            })
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_server_url(&self, cli_value: Option<String>) -> String {
        cli_value
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_complete_limit(&self, cli_value: Option<usize>) -> usize {
        cli_value
            .or(self.complete_limit)
            .unwrap_or(crate::search::DEFAULT_COMPLETE_LIMIT)
    }
}
