// File: src/config.rs
// Purpose: Routing configuration parsing from rhtmx.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Project configuration relevant to routing
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory containing page files, relative to the project root (default: "src/pages")
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Recognized page extensions without the dot; empty accepts any alphanumeric extension
    #[serde(default)]
    pub page_extensions: Vec<String>,

    /// Whether `/path/` also matches `/path` (default: true)
    #[serde(default = "default_true")]
    pub trailing_slash: bool,
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// Rebuild the manifest and invalidate static paths on file changes
    #[serde(default = "default_true")]
    pub watch: bool,

    /// Window in which rapid file events are coalesced
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// Default values
fn default_pages_dir() -> String {
    "src/pages".to_string()
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            page_extensions: Vec::new(),
            trailing_slash: true,
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            watch: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl RoutingConfig {
    /// Whether a file extension (with its dot) marks a page
    ///
    /// The extension must be `.` followed by ASCII letters or digits; when
    /// `page_extensions` is set it must also be listed there (case-insensitive).
    pub fn is_page_extension(&self, ext: &str) -> bool {
        let Some(bare) = ext.strip_prefix('.') else {
            return false;
        };

        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }

        self.page_extensions.is_empty()
            || self
                .page_extensions
                .iter()
                .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(bare))
    }
}

impl Config {
    /// Load configuration from rhtmx.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }
}
