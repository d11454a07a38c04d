//! File-backed identity provider.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use fsdt_core::{Identity, IdentityProvider, Result, Token, TokenKind};

use crate::store::{Authentication, CredentialStore};

/// Identity provider reading the principal, authentication mode and held
/// tokens from a [`CredentialStore`].
///
/// The authentication mode is read once at [`FileIdentityProvider::open`];
/// held tokens are re-read on every [`IdentityProvider::current`] call.
#[derive(Debug, Clone)]
pub struct FileIdentityProvider {
    store: CredentialStore,
    authentication: Authentication,
}

impl FileIdentityProvider {
    /// Open the provider for an existing store file.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing or malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = CredentialStore::new(path);
        let contents = store.load()?;
        Ok(Self {
            store,
            authentication: contents.authentication,
        })
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Returns the authentication mode read at open time.
    pub fn authentication(&self) -> Authentication {
        self.authentication
    }
}

#[async_trait]
impl IdentityProvider for FileIdentityProvider {
    fn is_security_enabled(&self) -> bool {
        self.authentication.is_secure()
    }

    #[instrument(skip(self), fields(path = %self.store.path().display()))]
    async fn current(&self) -> Result<Arc<dyn Identity>> {
        let contents = self.store.load()?;
        debug!(principal = %contents.principal, held = contents.tokens.len(), "Loaded identity");
        Ok(Arc::new(FileIdentity {
            principal: contents.principal,
            tokens: contents.tokens.into_iter().map(|held| held.token).collect(),
        }))
    }
}

/// Snapshot of the principal and its held tokens.
#[derive(Debug)]
pub struct FileIdentity {
    principal: String,
    tokens: Vec<Token>,
}

#[async_trait]
impl Identity for FileIdentity {
    fn principal(&self) -> &str {
        &self.principal
    }

    async fn find_token(&self, kind: &TokenKind, service: &str) -> Result<Option<Token>> {
        Ok(self
            .tokens
            .iter()
            .find(|token| token.kind() == kind && token.service() == service)
            .cloned())
    }
}
