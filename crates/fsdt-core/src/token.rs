//! Delegation token type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::TokenKind;

/// An issued delegation token.
///
/// Tokens are immutable once issued. The kind and service identify what the
/// token authorizes; the encoded form is the URL-safe string a filesystem
/// accepts back when the token is presented or cancelled.
///
/// # Security
///
/// - The encoded form is never displayed in Debug output
/// - Treat the encoded form as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    service: String,
    #[serde(rename = "token")]
    encoded: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    renewer: Option<String>,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, service: impl Into<String>, encoded: impl Into<String>) -> Self {
        Self {
            kind,
            service: service.into(),
            encoded: encoded.into(),
            renewer: None,
        }
    }

    /// Record the principal allowed to renew this token.
    pub fn with_renewer(mut self, renewer: impl Into<String>) -> Self {
        self.renewer = Some(renewer.into());
        self
    }

    /// Returns the kind of this token.
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Returns the canonical service name this token is scoped to.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the renewer, if one was recorded at issue time.
    pub fn renewer(&self) -> Option<&str> {
        self.renewer.as_deref()
    }

    /// Returns the encoded token for presenting to a filesystem.
    ///
    /// # Security
    ///
    /// Use only when constructing requests to the service that issued it.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("service", &self.service)
            .field("token", &"[REDACTED]")
            .field("renewer", &self.renewer)
            .finish()
    }
}
