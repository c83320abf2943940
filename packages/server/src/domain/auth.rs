//! Credential verification interface.

use async_trait::async_trait;

use super::{AuthClaims, AuthError};

/// Verifies the bearer credential carried by inbound chat frames.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthClaims, AuthError>;
}
