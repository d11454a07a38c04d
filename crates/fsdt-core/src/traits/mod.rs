//! Traits for the collaborators of the token manager.

mod identity;
mod service;

pub use identity::{Identity, IdentityProvider};
pub use service::{DeclaresTokenKind, ServiceHandle};
