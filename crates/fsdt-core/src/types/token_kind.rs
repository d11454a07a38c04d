//! Token kind type.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated delegation token kind.
///
/// The kind identifies which protocol family a token belongs to. Three kinds
/// are well known, but the set is open: any non-blank string is accepted.
///
/// # Example
///
/// ```
/// use fsdt_core::TokenKind;
///
/// let kind = TokenKind::new("WEBHDFS delegation").unwrap();
/// assert_eq!(kind, TokenKind::WEBHDFS);
/// assert_eq!(TokenKind::default(), TokenKind::HDFS_DELEGATION);
///
/// // A blank kind is treated as absent.
/// assert!(TokenKind::new("  ").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenKind(Cow<'static, str>);

impl TokenKind {
    /// Native distributed filesystem protocol (`hdfs://`). The default kind.
    pub const HDFS_DELEGATION: TokenKind = TokenKind(Cow::Borrowed("HDFS_DELEGATION_TOKEN"));

    /// HTTP tunnel (`webhdfs://`).
    pub const WEBHDFS: TokenKind = TokenKind(Cow::Borrowed("WEBHDFS delegation"));

    /// HTTPS tunnel (`swebhdfs://`).
    pub const SWEBHDFS: TokenKind = TokenKind(Cow::Borrowed("SWEBHDFS delegation"));

    /// Create a token kind from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is empty or blank. Any other string is
    /// kept exactly as given.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(Cow::Owned(s)))
    }

    /// Returns the kind as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.trim().is_empty() {
            return Err(InvalidInputError::TokenKind {
                value: s.to_string(),
                reason: "token kind must be present".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for TokenKind {
    fn default() -> Self {
        Self::HDFS_DELEGATION
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TokenKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TokenKind> for String {
    fn from(kind: TokenKind) -> Self {
        kind.0.into_owned()
    }
}

impl AsRef<str> for TokenKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
