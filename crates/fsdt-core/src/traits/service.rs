//! Filesystem service handle traits.

use async_trait::async_trait;

use crate::error::TokenError;
use crate::types::{FsUri, TokenKind};
use crate::{Result, Token};

/// A filesystem endpoint that delegation tokens are scoped to.
#[async_trait]
pub trait ServiceHandle: Send + Sync {
    /// Returns the connection URI of this filesystem.
    fn uri(&self) -> &FsUri;

    /// Returns the canonical service name used to scope tokens.
    fn canonical_service_name(&self) -> String {
        self.uri().canonical_service_name()
    }

    /// Returns the preferred-kind capability, if this filesystem declares one.
    ///
    /// Filesystems without it are served the default kind.
    fn token_kind_capability(&self) -> Option<&dyn DeclaresTokenKind> {
        None
    }

    /// Issue a fresh delegation token of `kind` that `renewer` may renew.
    async fn issue_token(&self, kind: &TokenKind, renewer: &str) -> Result<Token> {
        let _ = (kind, renewer);
        Err(TokenError::IssueUnsupported {
            scheme: self.uri().scheme().to_string(),
        }
        .into())
    }

    /// Cancel a token previously issued by this filesystem.
    async fn cancel_token(&self, token: &Token) -> Result<()> {
        let _ = token;
        Err(TokenError::CancelUnsupported {
            scheme: self.uri().scheme().to_string(),
        }
        .into())
    }
}

/// Capability of filesystems whose protocol needs a specific token kind.
pub trait DeclaresTokenKind: Send + Sync {
    /// Returns the token kind this filesystem's protocol accepts.
    fn preferred_token_kind(&self) -> TokenKind;
}
