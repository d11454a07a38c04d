//! Error types for fsdt.
//!
//! A single error type is shared by the core and every backend, with
//! explicit variants for token lifecycle, transport, protocol and input
//! validation failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for fsdt operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or IO transport errors (connection, timeout, file access).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Token lifecycle errors (nothing held, lookup failed, unsupported).
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Errors reported by a remote filesystem service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (token kind, filesystem URI, store contents).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this error means no token is currently held.
    pub fn is_not_acquired(&self) -> bool {
        matches!(self, Error::Token(TokenError::NotAcquired))
    }

    /// Returns true if this is an input validation error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the service failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local file access failed.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Token lifecycle errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No token has been acquired, or the held token was cancelled.
    #[error("no token acquired")]
    NotAcquired,

    /// The identity holds no matching token and the filesystem cannot
    /// issue one.
    #[error("no '{kind}' token available for service '{service}'")]
    NotFound { kind: String, service: String },

    /// The filesystem cannot issue tokens itself.
    #[error("'{scheme}' filesystems cannot issue delegation tokens")]
    IssueUnsupported { scheme: String },

    /// The filesystem cannot cancel tokens itself.
    #[error("'{scheme}' filesystems cannot cancel delegation tokens")]
    CancelUnsupported { scheme: String },
}

/// Errors reported by a remote service.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Remote exception name (if present).
    pub exception: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref exception) = self.exception {
            write!(f, " [{}]", exception)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, exception: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            exception,
            message,
        }
    }

    /// Check if the remote service rejected the caller's credentials.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.exception.as_deref() == Some("SecurityException")
            || self.exception.as_deref() == Some("InvalidToken")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Token kind absent or malformed.
    #[error("invalid token kind '{value}': {reason}")]
    TokenKind { value: String, reason: String },

    /// Invalid filesystem URI.
    #[error("invalid filesystem URI '{value}': {reason}")]
    FsUri { value: String, reason: String },

    /// Credential store contents could not be read or written.
    #[error("invalid credential store '{path}': {reason}")]
    Store { path: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display_includes_exception_and_message() {
        let err = ProtocolError::new(
            403,
            Some("SecurityException".to_string()),
            Some("Failed to obtain user group information".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "HTTP 403 [SecurityException]: Failed to obtain user group information"
        );
        assert!(err.is_auth_error());
    }

    #[test]
    fn protocol_error_display_status_only() {
        let err = ProtocolError::new(500, None, None);
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(!err.is_auth_error());
    }

    #[test]
    fn not_acquired_predicate() {
        let err: Error = TokenError::NotAcquired.into();
        assert!(err.is_not_acquired());
        assert!(!err.is_invalid_input());
    }
}
