//! Shared command setup: config, store and identity

use super::GlobalArgs;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use th_core::config::{default_data_dir, Config};
use th_core::forum::ForumService;
use th_core::store::{AuthState, MemoryStore, RecordStore, StaticAuth};
use th_core::types::{CommentId, PostId, UserId};
use th_storage::FileSystemStore;
use tracing::debug;

/// Project directory holding config and local data
pub const PROJECT_DIR: &str = ".threadhub";

/// Project-local config path
pub fn project_config_path() -> PathBuf {
    Path::new(PROJECT_DIR).join("config.toml")
}

/// Config path from --config, or the project-local one
pub fn config_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(project_config_path)
}

/// Load and validate the config
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = config_path(global);
    Config::load(&path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Data directory: --data-dir, then storage.data_dir, then the project
/// directory when initialized, then the platform data directory
pub fn resolve_data_dir(global: &GlobalArgs, config: &Config) -> PathBuf {
    if let Some(dir) = &global.data_dir {
        return dir.clone();
    }
    if let Some(dir) = &config.storage.data_dir {
        return dir.clone();
    }
    let project = Path::new(PROJECT_DIR);
    if project.is_dir() {
        return project.join("data");
    }
    default_data_dir()
}

/// Everything a command needs to talk to the forum
pub struct AppContext {
    pub config: Config,
    pub forum: Arc<ForumService>,
    pub auth: StaticAuth,
}

impl AppContext {
    /// Load config, open the store and resolve the user
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global)?;

        let store: Arc<dyn RecordStore> = if global.ephemeral {
            debug!("Using in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            let data_dir = resolve_data_dir(global, &config);
            debug!("Using data directory {}", data_dir.display());
            let mut store = FileSystemStore::new(&data_dir)
                .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
            if let Some(base) = &config.storage.public_url_base {
                store = store.with_public_url_base(base.clone());
            }
            Arc::new(store)
        };

        let user = global
            .user
            .clone()
            .or_else(|| config.identity.user.clone());
        let auth = match user {
            Some(name) => StaticAuth::signed_in(
                UserId::from_string(name).context("Invalid user name")?,
            ),
            None => StaticAuth::anonymous(),
        };

        Ok(Self {
            forum: Arc::new(ForumService::with_store(store, config.clone())),
            config,
            auth,
        })
    }

    /// The acting user, or an error telling how to set one
    pub fn require_user(&self) -> Result<UserId> {
        self.auth
            .require_user()
            .context("Pass --as <user>, set THREADHUB_USER or identity.user in the config")
    }
}

/// Parse a post id argument
pub fn parse_post_id(id: &str) -> Result<PostId> {
    PostId::from_string(id.trim()).with_context(|| format!("Invalid post id: {}", id))
}

/// Parse a comment id argument
pub fn parse_comment_id(id: &str) -> Result<CommentId> {
    CommentId::from_string(id.trim()).with_context(|| format!("Invalid comment id: {}", id))
}

/// Ask for confirmation unless `yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
