//! Identity provider traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::TokenKind;
use crate::{Result, Token};

/// Supplies the acting identity and the process security mode.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns true if delegation tokens are required in this environment.
    ///
    /// When false, token acquisition is a no-op.
    fn is_security_enabled(&self) -> bool;

    /// Returns the identity on whose behalf tokens are acquired.
    async fn current(&self) -> Result<Arc<dyn Identity>>;
}

/// The acting principal and the tokens it already holds.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Returns the principal name (e.g. "alice" or "alice@EXAMPLE.COM").
    fn principal(&self) -> &str;

    /// Look up a token already held for the given kind and service.
    ///
    /// Returns `Ok(None)` if no such token is held.
    async fn find_token(&self, kind: &TokenKind, service: &str) -> Result<Option<Token>>;
}
