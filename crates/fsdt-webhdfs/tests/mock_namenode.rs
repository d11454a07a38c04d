//! WebHDFS tests against a mock namenode.
//!
//! These tests use wiremock to simulate the namenode REST API and check the
//! requests issued for delegation token operations.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fsdt_core::{
    CancelOutcome, FsUri, Identity, IdentityProvider, Provenance, Result, ServiceHandle, Token,
    TokenKind, TokenManager,
};
use fsdt_webhdfs::WebHdfsFileSystem;

const ROOT: &str = "/webhdfs/v1/";

/// Helper to create a webhdfs handle pointing at a mock server.
fn mock_fs(server: &MockServer) -> WebHdfsFileSystem {
    let uri = FsUri::new(format!("webhdfs://127.0.0.1:{}", server.address().port())).unwrap();
    WebHdfsFileSystem::new(uri).unwrap()
}

fn service_name(server: &MockServer) -> String {
    format!("webhdfs://127.0.0.1:{}", server.address().port())
}

/// An identity that holds no tokens, so every acquire goes to the namenode.
struct EmptyIdentity;

#[async_trait]
impl Identity for EmptyIdentity {
    fn principal(&self) -> &str {
        "alice"
    }

    async fn find_token(&self, _kind: &TokenKind, _service: &str) -> Result<Option<Token>> {
        Ok(None)
    }
}

struct SecureProvider;

#[async_trait]
impl IdentityProvider for SecureProvider {
    fn is_security_enabled(&self) -> bool {
        true
    }

    async fn current(&self) -> Result<Arc<dyn Identity>> {
        Ok(Arc::new(EmptyIdentity))
    }
}

// ============================================================================
// Issue
// ============================================================================

#[tokio::test]
async fn test_issue_token_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .and(query_param("op", "GETDELEGATIONTOKEN"))
        .and(query_param("renewer", "yarn"))
        .and(query_param("kind", "WEBHDFS delegation"))
        .and(query_param("service", service_name(&server)))
        .and(query_param_is_missing("user.name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Token": { "urlString": "JQAIaG9ydG9ud29ya3M" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fs = mock_fs(&server);
    let token = fs.issue_token(&TokenKind::WEBHDFS, "yarn").await.unwrap();

    assert_eq!(token.kind(), &TokenKind::WEBHDFS);
    assert_eq!(token.service(), service_name(&server));
    assert_eq!(token.encoded(), "JQAIaG9ydG9ud29ya3M");
    assert_eq!(token.renewer(), Some("yarn"));
}

#[tokio::test]
async fn test_issue_token_sends_user_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .and(query_param("op", "GETDELEGATIONTOKEN"))
        .and(query_param("user.name", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Token": { "urlString": "abc" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fs = mock_fs(&server).with_user_name("alice");
    fs.issue_token(&TokenKind::WEBHDFS, "yarn").await.unwrap();
}

#[tokio::test]
async fn test_issue_token_remote_exception() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "RemoteException": {
                "exception": "SecurityException",
                "javaClassName": "java.lang.SecurityException",
                "message": "Failed to obtain user group information"
            }
        })))
        .mount(&server)
        .await;

    let fs = mock_fs(&server);
    let err = fs
        .issue_token(&TokenKind::WEBHDFS, "yarn")
        .await
        .unwrap_err();

    match err {
        fsdt_core::Error::Protocol(protocol) => {
            assert_eq!(protocol.status, 403);
            assert_eq!(protocol.exception.as_deref(), Some("SecurityException"));
            assert!(protocol.is_auth_error());
        }
        other => panic!("expected protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_token_error_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fs = mock_fs(&server);
    let err = fs
        .issue_token(&TokenKind::WEBHDFS, "yarn")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("HTTP 500"));
}

// ============================================================================
// Cancel
// ============================================================================

#[tokio::test]
async fn test_cancel_token_request() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(ROOT))
        .and(query_param("op", "CANCELDELEGATIONTOKEN"))
        .and(query_param("token", "JQAIaG9ydG9ud29ya3M"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let fs = mock_fs(&server);
    let token = Token::new(
        TokenKind::WEBHDFS,
        service_name(&server),
        "JQAIaG9ydG9ud29ya3M",
    );
    fs.cancel_token(&token).await.unwrap();
}

// ============================================================================
// Token manager
// ============================================================================

#[tokio::test]
async fn test_manager_issues_and_revokes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .and(query_param("op", "GETDELEGATIONTOKEN"))
        .and(query_param("renewer", "yarn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Token": { "urlString": "issued-token" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(ROOT))
        .and(query_param("op", "CANCELDELEGATIONTOKEN"))
        .and(query_param("token", "issued-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = TokenManager::new(Arc::new(SecureProvider), "yarn");
    manager.acquire(Arc::new(mock_fs(&server))).await.unwrap();

    assert_eq!(manager.provenance(), Some(Provenance::Issued));
    assert_eq!(manager.user_token().unwrap().kind(), &TokenKind::WEBHDFS);

    assert!(matches!(manager.cancel().await, CancelOutcome::Revoked));
    assert!(manager.user_token().is_err());
}

#[tokio::test]
async fn test_manager_explicit_kind_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .and(query_param("op", "GETDELEGATIONTOKEN"))
        .and(query_param("kind", "SWEBHDFS delegation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Token": { "urlString": "explicit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = TokenManager::new(Arc::new(SecureProvider), "yarn");
    manager
        .acquire_with_kind("SWEBHDFS delegation", Arc::new(mock_fs(&server)))
        .await
        .unwrap();

    assert_eq!(manager.user_token().unwrap().kind(), &TokenKind::SWEBHDFS);
}

#[tokio::test]
async fn test_manager_revoke_failure_clears_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Token": { "urlString": "issued-token" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(ROOT))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "RemoteException": {
                "exception": "InvalidToken",
                "javaClassName": "org.apache.hadoop.security.token.SecretManager$InvalidToken",
                "message": "token is expired"
            }
        })))
        .mount(&server)
        .await;

    let mut manager = TokenManager::new(Arc::new(SecureProvider), "yarn");
    manager.acquire(Arc::new(mock_fs(&server))).await.unwrap();

    match manager.cancel().await {
        CancelOutcome::RevokeFailed(e) => assert!(e.to_string().contains("InvalidToken")),
        other => panic!("expected RevokeFailed, got {:?}", other),
    }
    assert!(!manager.is_acquired());
}
