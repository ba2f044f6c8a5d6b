//! Configuration management for threadhub

use crate::error::{Result, ThreadHubError};
use crate::post::FeedSort;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Hard cap on the stored depth of a reply
pub const MAX_REPLY_DEPTH: u32 = 10;

/// Nesting level past which indentation stops growing
pub const MAX_DISPLAY_DEPTH: u32 = 8;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment thread settings
    pub thread: ThreadConfig,
    /// Feed settings
    pub feed: FeedConfig,
    /// Storage settings
    pub storage: StorageConfig,
    /// Signed-in identity
    pub identity: IdentityConfig,
    /// UI settings
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let thread = &self.thread;
        if thread.max_reply_depth == 0 || thread.max_reply_depth > MAX_REPLY_DEPTH {
            return Err(ThreadHubError::Config(format!(
                "thread.max_reply_depth must be between 1 and {}",
                MAX_REPLY_DEPTH
            )));
        }
        if thread.max_display_depth > thread.max_reply_depth {
            return Err(ThreadHubError::Config(
                "thread.max_display_depth cannot exceed thread.max_reply_depth".to_string(),
            ));
        }
        if thread.max_comment_length == 0 {
            return Err(ThreadHubError::Config(
                "thread.max_comment_length must be positive".to_string(),
            ));
        }
        if self.feed.page_size == 0 {
            return Err(ThreadHubError::Config(
                "feed.page_size must be positive".to_string(),
            ));
        }
        if !(self.feed.hot_gravity.is_finite() && self.feed.hot_gravity > 0.0) {
            return Err(ThreadHubError::Config(
                "feed.hot_gravity must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Comment thread configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Stored depth cap for new replies
    pub max_reply_depth: u32,
    /// Indentation cap when rendering
    pub max_display_depth: u32,
    /// Columns of indentation per level
    pub indent_width: usize,
    /// Maximum comment content length
    pub max_comment_length: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_reply_depth: MAX_REPLY_DEPTH,
            max_display_depth: MAX_DISPLAY_DEPTH,
            indent_width: 2,
            max_comment_length: 10000,
        }
    }
}

/// Feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Sort order used when none is given
    pub default_sort: FeedSort,
    /// Number of posts per listing
    pub page_size: usize,
    /// Exponent of the age decay in the hot score
    pub hot_gravity: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_sort: FeedSort::Hot,
            page_size: 25,
            hot_gravity: 1.5,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding collection files; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Prefix for URLs handed out for uploaded files
    pub public_url_base: Option<String>,
}

impl StorageConfig {
    /// Resolve the data directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Platform data directory (~/.threadhub as a last resort)
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "threadhub", "threadhub")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".threadhub")
        })
}

/// Identity configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// User to act as
    pub user: Option<String>,
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme
    pub theme: String,
    /// Show net scores next to comments
    pub show_scores: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            show_scores: true,
        }
    }
}
