//! Credential store location.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use fsdt_file::{CredentialStore, FileIdentityProvider};

/// Resolve the store path: `--store` if given, else the platform data dir.
pub fn store_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let dirs = ProjectDirs::from("", "", "fsdt").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("credentials.json"))
}

/// Open the store for writing, creating it on first write.
pub fn open_store(explicit: Option<PathBuf>) -> Result<CredentialStore> {
    Ok(CredentialStore::new(store_path(explicit)?))
}

/// Open the identity provider backed by an existing store.
pub fn open_provider(explicit: Option<PathBuf>) -> Result<FileIdentityProvider> {
    let path = store_path(explicit)?;
    tracing::debug!(path = %path.display(), "Opening credential store");
    FileIdentityProvider::open(&path).with_context(|| {
        format!(
            "Failed to open credential store at {}. Run 'fsdt init' first.",
            path.display()
        )
    })
}
