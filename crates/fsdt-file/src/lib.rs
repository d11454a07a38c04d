//! fsdt-file - File-backed identity provider.

mod provider;
mod store;

pub use provider::{FileIdentity, FileIdentityProvider};
pub use store::{Authentication, CredentialStore, HeldToken, StoreContents};
