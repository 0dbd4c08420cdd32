//! Identity collaborator: bearer token -> verified caller.
//!
//! Tokens are issued out of band and loaded from config at startup.

mod extract;

pub use extract::Authenticated;

use async_trait::async_trait;
use dashmap::DashMap;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::UserId;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn resolve(&self, token: &str) -> Result<UserId>;
}

/// Fixed token table seeded at startup.
#[derive(Default)]
pub struct StaticTokenIdentity {
    tokens: DashMap<String, UserId>,
}

impl StaticTokenIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, user: UserId) {
        self.tokens.insert(token.into(), user);
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn resolve(&self, token: &str) -> Result<UserId> {
        self.tokens
            .get(token)
            .map(|u| *u.value())
            .ok_or(CsrError::AuthFailed)
    }
}
