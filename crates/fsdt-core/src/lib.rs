//! fsdt-core - Core types, traits and token manager for filesystem
//! delegation tokens.
//!
//! Different filesystem access protocols need different delegation token
//! kinds. [`TokenManager`] hides that: given any [`ServiceHandle`] it picks
//! the kind the protocol requires, obtains the token for the current
//! identity, and cancels it when the unit of work is done.

pub mod error;
pub mod manager;
pub mod native;
pub mod token;
pub mod traits;
pub mod types;

pub use error::Error;
pub use manager::{Acquisition, CancelOutcome, Provenance, TokenManager, TokenState};
pub use native::NativeFileSystem;
pub use token::Token;
pub use traits::{DeclaresTokenKind, Identity, IdentityProvider, ServiceHandle};
pub use types::{FsUri, TokenKind};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
