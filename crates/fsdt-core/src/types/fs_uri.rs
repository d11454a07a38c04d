//! Filesystem URI type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Scheme of the native distributed filesystem protocol.
pub const HDFS_SCHEME: &str = "hdfs";

/// Scheme of the HTTP-tunneled protocol.
pub const WEBHDFS_SCHEME: &str = "webhdfs";

/// Scheme of the HTTPS-tunneled protocol.
pub const SWEBHDFS_SCHEME: &str = "swebhdfs";

/// A validated filesystem connection URI.
///
/// The URI must be absolute and carry a host. The canonical service name
/// (`scheme://host:port`) is the scoping key under which delegation tokens
/// are issued and looked up; well-known schemes fill in their default port.
///
/// # Example
///
/// ```
/// use fsdt_core::FsUri;
///
/// let uri = FsUri::new("webhdfs://namenode.example.com/user/alice").unwrap();
/// assert_eq!(uri.port(), Some(9870));
/// assert_eq!(uri.canonical_service_name(), "webhdfs://namenode.example.com:9870");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FsUri(Url);

impl FsUri {
    /// Create a new filesystem URI from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is not absolute or has no host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::FsUri {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(InvalidInputError::FsUri {
                value: s.to_string(),
                reason: "must be an absolute URI".to_string(),
            }
            .into());
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(InvalidInputError::FsUri {
                value: s.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(Self(url))
    }

    /// Returns the scheme (e.g. "hdfs", "webhdfs").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the host.
    pub fn host(&self) -> &str {
        // Validated at construction
        self.0.host_str().unwrap_or_default()
    }

    /// Returns the explicit port, or the default port for well-known schemes.
    pub fn port(&self) -> Option<u16> {
        self.0.port().or_else(|| default_port(self.scheme()))
    }

    /// Returns the path component.
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Returns the canonical service name used to scope tokens.
    pub fn canonical_service_name(&self) -> String {
        match self.port() {
            Some(port) => format!("{}://{}:{}", self.scheme(), self.host(), port),
            None => format!("{}://{}", self.scheme(), self.host()),
        }
    }

    /// Returns the full URI as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        HDFS_SCHEME => Some(8020),
        WEBHDFS_SCHEME => Some(9870),
        SWEBHDFS_SCHEME => Some(9871),
        _ => None,
    }
}

impl fmt::Display for FsUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FsUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for FsUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for FsUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FsUri::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for FsUri {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
