//! Delegation token acquisition for a single unit of work.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, TokenError};
use crate::traits::{IdentityProvider, ServiceHandle};
use crate::types::TokenKind;
use crate::{Result, Token};

/// How the held token came to be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The identity already held the token; it belongs to an outer context.
    Forwarded,
    /// The token was issued for this unit of work.
    Issued,
}

/// The token held by a manager together with the filesystem it scopes.
pub struct Acquisition {
    token: Token,
    service: Arc<dyn ServiceHandle>,
    provenance: Provenance,
}

impl Acquisition {
    /// Returns the held token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the filesystem the token was acquired for.
    pub fn service(&self) -> &Arc<dyn ServiceHandle> {
        &self.service
    }

    /// Returns how the token came to be held.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl fmt::Debug for Acquisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acquisition")
            .field("token", &self.token)
            .field("service", &self.service.uri().as_str())
            .field("provenance", &self.provenance)
            .finish()
    }
}

/// The single token slot of a [`TokenManager`].
#[derive(Debug, Default)]
pub enum TokenState {
    /// No token held.
    #[default]
    Unacquired,
    /// A token is held.
    Acquired(Acquisition),
}

/// Result of [`TokenManager::cancel`].
///
/// Cancellation never fails from the manager's point of view; a remote
/// failure is reported here so the caller can decide whether to escalate.
#[derive(Debug)]
pub enum CancelOutcome {
    /// No token was held.
    NothingHeld,
    /// A forwarded token was dropped without remote cancellation.
    Released,
    /// An issued token was cancelled by its filesystem.
    Revoked,
    /// Remote cancellation failed; the token was dropped regardless.
    RevokeFailed(Error),
}

/// Acquires and tracks the delegation token a filesystem needs.
///
/// One manager is created per unit of work (for example one job
/// submission). It decides which token kind the filesystem's protocol
/// requires, looks up the token held by the current identity (or has the
/// filesystem issue one for the renewer), keeps at most one token, and
/// cancels it at the end of the work.
///
/// Mutating operations take `&mut self`; sharing a manager across tasks
/// needs external synchronization.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use fsdt_core::{FsUri, IdentityProvider, NativeFileSystem, TokenManager};
///
/// # async fn example(provider: Arc<dyn IdentityProvider>) -> Result<(), fsdt_core::Error> {
/// let fs = Arc::new(NativeFileSystem::new(FsUri::new("hdfs://namenode")?)?);
/// let mut manager = TokenManager::new(provider, "yarn");
///
/// manager.acquire(fs).await?;
/// println!("using {:?}", manager.user_token()?);
///
/// manager.cancel().await;
/// # Ok(())
/// # }
/// ```
pub struct TokenManager {
    provider: Arc<dyn IdentityProvider>,
    renewer: String,
    state: TokenState,
}

impl TokenManager {
    /// Create a manager acting through `provider` on behalf of `renewer`.
    pub fn new(provider: Arc<dyn IdentityProvider>, renewer: impl Into<String>) -> Self {
        Self {
            provider,
            renewer: renewer.into(),
            state: TokenState::Unacquired,
        }
    }

    /// Returns the principal allowed to renew acquired tokens.
    pub fn renewer(&self) -> &str {
        &self.renewer
    }

    /// Returns the token kind the filesystem's protocol requires.
    pub fn resolve_token_kind(service: &dyn ServiceHandle) -> TokenKind {
        service
            .token_kind_capability()
            .map(|capability| capability.preferred_token_kind())
            .unwrap_or_default()
    }

    /// Acquire the token the filesystem needs, resolving its kind.
    ///
    /// A no-op when security is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::NotFound`] when the identity holds no matching
    /// token and the filesystem cannot issue one. Other lookup or issuance
    /// errors are returned unchanged. The previously held token (if any)
    /// stays in place.
    pub async fn acquire(&mut self, service: Arc<dyn ServiceHandle>) -> Result<()> {
        if !self.provider.is_security_enabled() {
            debug!("Security disabled, skipping token acquisition");
            return Ok(());
        }

        let kind = Self::resolve_token_kind(service.as_ref());
        self.acquire_resolved(kind, service).await
    }

    /// Acquire a token of an explicitly given kind, bypassing resolution.
    ///
    /// A no-op when security is disabled.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error if `kind` is absent (empty or blank)
    /// before doing anything else. Otherwise errors as [`Self::acquire`].
    pub async fn acquire_with_kind(
        &mut self,
        kind: impl AsRef<str>,
        service: Arc<dyn ServiceHandle>,
    ) -> Result<()> {
        let kind = TokenKind::new(kind.as_ref())?;

        if !self.provider.is_security_enabled() {
            debug!(%kind, "Security disabled, skipping token acquisition");
            return Ok(());
        }

        self.acquire_resolved(kind, service).await
    }

    #[instrument(skip(self, kind, service), fields(renewer = %self.renewer, %kind))]
    async fn acquire_resolved(
        &mut self,
        kind: TokenKind,
        service: Arc<dyn ServiceHandle>,
    ) -> Result<()> {
        let service_name = service.canonical_service_name();
        let identity = self.provider.current().await?;

        let (token, provenance) = match identity.find_token(&kind, &service_name).await? {
            Some(token) => {
                info!(principal = identity.principal(), %service_name, "Using existing token");
                (token, Provenance::Forwarded)
            }
            None => {
                debug!(%service_name, "No token held, requesting one from the filesystem");
                let token = service
                    .issue_token(&kind, &self.renewer)
                    .await
                    .map_err(|e| match e {
                        Error::Token(TokenError::IssueUnsupported { .. }) => TokenError::NotFound {
                            kind: kind.to_string(),
                            service: service_name.clone(),
                        }
                        .into(),
                        other => other,
                    })?;
                info!(principal = identity.principal(), %service_name, "Issued new token");
                (token, Provenance::Issued)
            }
        };

        if token.kind() != &kind {
            warn!(returned = %token.kind(), "Token kind differs from the requested kind");
        }

        self.state = TokenState::Acquired(Acquisition {
            token,
            service,
            provenance,
        });
        Ok(())
    }

    /// Returns the token last acquired.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::NotAcquired`] if nothing is held, including
    /// after a no-op acquire with security disabled and after [`Self::cancel`].
    pub fn user_token(&self) -> Result<&Token> {
        match &self.state {
            TokenState::Acquired(acquisition) => Ok(&acquisition.token),
            TokenState::Unacquired => Err(TokenError::NotAcquired.into()),
        }
    }

    /// Returns the provenance of the held token, if any.
    pub fn provenance(&self) -> Option<Provenance> {
        match &self.state {
            TokenState::Acquired(acquisition) => Some(acquisition.provenance),
            TokenState::Unacquired => None,
        }
    }

    /// Returns true if a token is held.
    pub fn is_acquired(&self) -> bool {
        matches!(self.state, TokenState::Acquired(_))
    }

    /// Returns the current token slot.
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Relinquish the held token.
    ///
    /// Issued tokens are cancelled by the filesystem that issued them;
    /// forwarded tokens are only dropped. The slot is cleared whatever the
    /// remote outcome. A no-op when nothing is held.
    #[instrument(skip(self), fields(renewer = %self.renewer))]
    pub async fn cancel(&mut self) -> CancelOutcome {
        let acquisition = match std::mem::take(&mut self.state) {
            TokenState::Acquired(acquisition) => acquisition,
            TokenState::Unacquired => return CancelOutcome::NothingHeld,
        };

        match acquisition.provenance {
            Provenance::Forwarded => {
                debug!(kind = %acquisition.token.kind(), "Releasing forwarded token");
                CancelOutcome::Released
            }
            Provenance::Issued => {
                match acquisition.service.cancel_token(&acquisition.token).await {
                    Ok(()) => {
                        info!(kind = %acquisition.token.kind(), "Cancelled token");
                        CancelOutcome::Revoked
                    }
                    Err(e) => {
                        warn!(error = %e, kind = %acquisition.token.kind(), "Failed to cancel token");
                        CancelOutcome::RevokeFailed(e)
                    }
                }
            }
        }
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("renewer", &self.renewer)
            .field("state", &self.state)
            .finish()
    }
}
