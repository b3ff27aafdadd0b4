use async_trait::async_trait;

use retouch_types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no signed-in user")]
    Unauthenticated,

    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the user acting in a session.
#[async_trait]
pub trait AuthResolver: Send + Sync {
    async fn resolve(&self) -> Result<UserId, AuthError>;
}

/// Always resolves to the same user.
#[derive(Clone, Debug)]
pub struct StaticAuth {
    user: UserId,
}

impl StaticAuth {
    pub fn new(user: UserId) -> Self {
        Self { user }
    }
}

#[async_trait]
impl AuthResolver for StaticAuth {
    async fn resolve(&self) -> Result<UserId, AuthError> {
        Ok(self.user.clone())
    }
}

/// No one is signed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

#[async_trait]
impl AuthResolver for Anonymous {
    async fn resolve(&self) -> Result<UserId, AuthError> {
        Err(AuthError::Unauthenticated)
    }
}
