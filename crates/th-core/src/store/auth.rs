//! Signed-in identity

use crate::error::{Result, ThreadHubError};
use crate::types::UserId;

/// Source of the current signed-in identity
pub trait AuthState: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<UserId>;

    /// The signed-in user, or `NotSignedIn`
    fn require_user(&self) -> Result<UserId> {
        self.current_user().ok_or(ThreadHubError::NotSignedIn)
    }
}

/// Identity fixed at startup (CLI flag, environment or config)
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    /// Signed in as `user`
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    /// Nobody signed in
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthState for StaticAuth {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}
