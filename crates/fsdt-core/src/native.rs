//! Handle for the native distributed filesystem protocol.

use crate::error::{Error, InvalidInputError};
use crate::traits::ServiceHandle;
use crate::types::{FsUri, HDFS_SCHEME};

/// A native `hdfs://` filesystem handle.
///
/// The native protocol uses the default token kind, so this handle declares
/// no preference. Issuing and cancelling tokens over the native RPC protocol
/// is out of reach here: tokens for these filesystems must already be held
/// by the acting identity.
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    uri: FsUri,
}

impl NativeFileSystem {
    /// Create a handle for an `hdfs://` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI uses another scheme.
    pub fn new(uri: FsUri) -> Result<Self, Error> {
        if uri.scheme() != HDFS_SCHEME {
            return Err(InvalidInputError::FsUri {
                value: uri.to_string(),
                reason: format!("expected '{}' scheme", HDFS_SCHEME),
            }
            .into());
        }
        Ok(Self { uri })
    }
}

impl ServiceHandle for NativeFileSystem {
    fn uri(&self) -> &FsUri {
        &self.uri
    }
}
