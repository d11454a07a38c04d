//! WebHDFS filesystem handles.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use fsdt_core::error::InvalidInputError;
use fsdt_core::types::{SWEBHDFS_SCHEME, WEBHDFS_SCHEME};
use fsdt_core::{DeclaresTokenKind, FsUri, Result, ServiceHandle, Token, TokenKind};

use crate::client::WebHdfsClient;
use crate::endpoints::{
    CANCEL_DELEGATION_TOKEN, CancelDelegationTokenQuery, GET_DELEGATION_TOKEN,
    GetDelegationTokenQuery, GetDelegationTokenResponse,
};

/// A `webhdfs://` or `swebhdfs://` filesystem.
///
/// `webhdfs` talks plain HTTP to the namenode and needs `WEBHDFS delegation`
/// tokens; `swebhdfs` talks HTTPS and needs `SWEBHDFS delegation` tokens.
/// Both can issue and cancel tokens through the REST API.
///
/// # Example
///
/// ```
/// use fsdt_core::{FsUri, ServiceHandle, TokenKind, TokenManager};
/// use fsdt_webhdfs::WebHdfsFileSystem;
///
/// let fs = WebHdfsFileSystem::new(FsUri::new("swebhdfs://nn.example.com").unwrap()).unwrap();
/// assert_eq!(fs.canonical_service_name(), "swebhdfs://nn.example.com:9871");
/// assert_eq!(TokenManager::resolve_token_kind(&fs), TokenKind::SWEBHDFS);
/// ```
#[derive(Debug, Clone)]
pub struct WebHdfsFileSystem {
    uri: FsUri,
    kind: TokenKind,
    client: WebHdfsClient,
    user_name: Option<String>,
}

impl WebHdfsFileSystem {
    /// Create a handle for a `webhdfs://` or `swebhdfs://` URI.
    ///
    /// # Errors
    ///
    /// Returns an error for any other scheme.
    pub fn new(uri: FsUri) -> Result<Self> {
        let (transport, kind) = match uri.scheme() {
            WEBHDFS_SCHEME => ("http", TokenKind::WEBHDFS),
            SWEBHDFS_SCHEME => ("https", TokenKind::SWEBHDFS),
            other => {
                return Err(InvalidInputError::FsUri {
                    value: uri.to_string(),
                    reason: format!(
                        "unsupported scheme '{}', expected '{}' or '{}'",
                        other, WEBHDFS_SCHEME, SWEBHDFS_SCHEME
                    ),
                }
                .into());
            }
        };

        let base = match uri.port() {
            Some(port) => format!("{}://{}:{}", transport, uri.host(), port),
            None => format!("{}://{}", transport, uri.host()),
        };
        let client = WebHdfsClient::new(&base)?;

        Ok(Self {
            uri,
            kind,
            client,
            user_name: None,
        })
    }

    /// Send `user.name` with every request, for clusters using simple
    /// authentication in front of the REST gateway.
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Returns the REST client.
    pub fn client(&self) -> &WebHdfsClient {
        &self.client
    }

    /// Returns true if this filesystem uses HTTPS.
    pub fn is_secure(&self) -> bool {
        self.uri.scheme() == SWEBHDFS_SCHEME
    }
}

impl DeclaresTokenKind for WebHdfsFileSystem {
    fn preferred_token_kind(&self) -> TokenKind {
        self.kind.clone()
    }
}

#[async_trait]
impl ServiceHandle for WebHdfsFileSystem {
    fn uri(&self) -> &FsUri {
        &self.uri
    }

    fn token_kind_capability(&self) -> Option<&dyn DeclaresTokenKind> {
        Some(self as &dyn DeclaresTokenKind)
    }

    #[instrument(skip(self), fields(uri = %self.uri))]
    async fn issue_token(&self, kind: &TokenKind, renewer: &str) -> Result<Token> {
        let service = self.canonical_service_name();
        debug!(%service, "Requesting delegation token");

        let query = GetDelegationTokenQuery {
            op: GET_DELEGATION_TOKEN,
            renewer,
            service: &service,
            kind: kind.as_str(),
            user_name: self.user_name.as_deref(),
        };

        let response: GetDelegationTokenResponse =
            self.client.get(GET_DELEGATION_TOKEN, &query).await?;

        info!(%service, "Delegation token issued");
        Ok(Token::new(kind.clone(), service, response.token.url_string).with_renewer(renewer))
    }

    #[instrument(skip(self, token), fields(uri = %self.uri, kind = %token.kind()))]
    async fn cancel_token(&self, token: &Token) -> Result<()> {
        let query = CancelDelegationTokenQuery {
            op: CANCEL_DELEGATION_TOKEN,
            token: token.encoded(),
            user_name: self.user_name.as_deref(),
        };

        self.client
            .put_no_response(CANCEL_DELEGATION_TOKEN, &query)
            .await?;

        info!("Delegation token cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhdfs_uses_http_and_webhdfs_kind() {
        let fs = WebHdfsFileSystem::new(FsUri::new("webhdfs://nn:50070").unwrap()).unwrap();
        assert!(!fs.is_secure());
        assert_eq!(fs.client().endpoint(), "http://nn:50070/webhdfs/v1/");
        assert_eq!(fs.preferred_token_kind(), TokenKind::WEBHDFS);
        assert_eq!(fs.canonical_service_name(), "webhdfs://nn:50070");
    }

    #[test]
    fn swebhdfs_uses_https_and_default_port() {
        let fs = WebHdfsFileSystem::new(FsUri::new("swebhdfs://nn").unwrap()).unwrap();
        assert!(fs.is_secure());
        assert_eq!(fs.client().endpoint(), "https://nn:9871/webhdfs/v1/");
        assert_eq!(fs.preferred_token_kind(), TokenKind::SWEBHDFS);
    }

    #[test]
    fn declares_capability() {
        let fs = WebHdfsFileSystem::new(FsUri::new("webhdfs://nn").unwrap()).unwrap();
        let capability = fs.token_kind_capability().unwrap();
        assert_eq!(capability.preferred_token_kind(), TokenKind::WEBHDFS);
    }

    #[test]
    fn rejects_native_scheme() {
        let err = WebHdfsFileSystem::new(FsUri::new("hdfs://nn").unwrap()).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'hdfs'"));
    }
}
