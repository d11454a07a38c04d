//! JSON credential store.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use fsdt_core::error::{Error, InvalidInputError};
use fsdt_core::{Result, Token, TokenKind};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// How the acting principal authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authentication {
    /// No authentication; delegation tokens are not used.
    #[default]
    Simple,
    /// Kerberos authentication; delegation tokens are required.
    Kerberos,
}

impl Authentication {
    /// Returns true if this mode requires delegation tokens.
    pub fn is_secure(self) -> bool {
        self == Authentication::Kerberos
    }
}

/// A token held by the principal, with the time it was added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeldToken {
    #[serde(flatten)]
    pub token: Token,
    /// RFC 3339 timestamp.
    pub added_at: String,
}

/// On-disk layout of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreContents {
    /// The acting principal.
    pub principal: String,
    /// Authentication mode of the environment.
    #[serde(default)]
    pub authentication: Authentication,
    /// Tokens already held by the principal.
    #[serde(default)]
    pub tokens: Vec<HeldToken>,
}

/// A credential store persisted as a single JSON file.
///
/// Writers take an exclusive advisory lock on a sibling `.lock` file for the
/// whole read-modify-write cycle and publish the result by renaming a
/// `0600` temp file over the store. Readers take no lock.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store handle for the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn store_error(&self, reason: impl ToString) -> Error {
        InvalidInputError::Store {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
        .into()
    }

    /// Create the store, or update the principal and authentication of an
    /// existing one. Held tokens are kept.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn init(&self, principal: &str, authentication: Authentication) -> Result<StoreContents> {
        if principal.trim().is_empty() {
            return Err(InvalidInputError::Other {
                message: "principal must not be empty".to_string(),
            }
            .into());
        }

        self.update(|contents| {
            contents.principal = principal.to_string();
            contents.authentication = authentication;
        })
    }

    /// Read the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn load(&self) -> Result<StoreContents> {
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| self.store_error(e))
    }

    /// Returns the held tokens.
    pub fn tokens(&self) -> Result<Vec<HeldToken>> {
        Ok(self.load()?.tokens)
    }

    /// Add a held token, replacing any token with the same kind and service.
    #[instrument(skip(self, token), fields(path = %self.path.display(), kind = %token.kind()))]
    pub fn add_token(&self, token: Token) -> Result<()> {
        self.update(|contents| {
            contents.tokens.retain(|held| {
                !(held.token.kind() == token.kind() && held.token.service() == token.service())
            });
            contents.tokens.push(HeldToken {
                token,
                added_at: Utc::now().to_rfc3339(),
            });
        })?;
        debug!("Token stored");
        Ok(())
    }

    /// Remove the held token for the kind and service.
    ///
    /// Returns true if a token was removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn remove_token(&self, kind: &TokenKind, service: &str) -> Result<bool> {
        let mut removed = false;
        self.update(|contents| {
            let before = contents.tokens.len();
            contents
                .tokens
                .retain(|held| !(held.token.kind() == kind && held.token.service() == service));
            removed = contents.tokens.len() != before;
        })?;
        Ok(removed)
    }

    /// Write `bytes` to a private sibling file and rename it over the store,
    /// so readers see either the old or the new contents. Caller holds the
    /// store lock.
    fn replace_with(&self, bytes: &[u8]) -> Result<()> {
        let temp_path = self.sibling(".tmp");

        // Left behind by an interrupted write; it may have other permissions.
        match fs::remove_file(&temp_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        // Tokens are secrets
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Apply `change` under the store lock and write the result back.
    fn update(&self, change: impl FnOnce(&mut StoreContents)) -> Result<StoreContents> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.sibling(".lock"))?;
        lock_file.lock_exclusive()?;

        let mut contents = if self.exists() {
            self.load()?
        } else {
            StoreContents {
                principal: String::new(),
                authentication: Authentication::default(),
                tokens: Vec::new(),
            }
        };

        change(&mut contents);

        let json = serde_json::to_string_pretty(&contents).map_err(|e| self.store_error(e))?;
        self.replace_with(json.as_bytes())?;

        lock_file.unlock()?;
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("nested").join("credentials.json"))
    }

    #[test]
    fn init_creates_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.init("alice", Authentication::Kerberos).unwrap();

        let contents = store.load().unwrap();
        assert_eq!(contents.principal, "alice");
        assert!(contents.authentication.is_secure());
        assert!(contents.tokens.is_empty());
    }

    #[test]
    fn init_rejects_empty_principal() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).init(" ", Authentication::Simple).is_err());
    }

    #[test]
    fn reinit_keeps_tokens() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();
        store
            .add_token(Token::new(TokenKind::HDFS_DELEGATION, "hdfs://nn:8020", "a"))
            .unwrap();

        store.init("alice", Authentication::Simple).unwrap();

        let contents = store.load().unwrap();
        assert_eq!(contents.authentication, Authentication::Simple);
        assert_eq!(contents.tokens.len(), 1);
    }

    #[test]
    fn add_token_replaces_same_kind_and_service() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();

        store
            .add_token(Token::new(TokenKind::WEBHDFS, "webhdfs://nn:9870", "old"))
            .unwrap();
        store
            .add_token(Token::new(TokenKind::HDFS_DELEGATION, "hdfs://nn:8020", "native"))
            .unwrap();
        store
            .add_token(Token::new(TokenKind::WEBHDFS, "webhdfs://nn:9870", "new"))
            .unwrap();

        let tokens = store.tokens().unwrap();
        assert_eq!(tokens.len(), 2);
        let web = tokens
            .iter()
            .find(|held| held.token.kind() == &TokenKind::WEBHDFS)
            .unwrap();
        assert_eq!(web.token.encoded(), "new");
    }

    #[test]
    fn remove_token_reports_whether_removed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();
        store
            .add_token(Token::new(TokenKind::SWEBHDFS, "swebhdfs://nn:9871", "t"))
            .unwrap();

        assert!(
            store
                .remove_token(&TokenKind::SWEBHDFS, "swebhdfs://nn:9871")
                .unwrap()
        );
        assert!(
            !store
                .remove_token(&TokenKind::SWEBHDFS, "swebhdfs://nn:9871")
                .unwrap()
        );
        assert!(store.tokens().unwrap().is_empty());
    }

    #[test]
    fn stored_layout_is_flat() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();
        store
            .add_token(Token::new(TokenKind::HDFS_DELEGATION, "hdfs://nn:8020", "secret"))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["authentication"], "kerberos");
        assert_eq!(raw["tokens"][0]["kind"], "HDFS_DELEGATION_TOKEN");
        assert_eq!(raw["tokens"][0]["token"], "secret");
        assert!(raw["tokens"][0]["added_at"].is_string());
    }

    #[test]
    fn load_missing_store_fails() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_err());
    }

    #[test]
    fn load_malformed_store_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();

        let err = CredentialStore::new(&path).load().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn store_stays_readable_and_private_across_writes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();

        for i in 0..5 {
            store
                .add_token(Token::new(
                    TokenKind::WEBHDFS,
                    format!("webhdfs://nn{}:9870", i),
                    format!("token-{}", i),
                ))
                .unwrap();

            assert_eq!(store.tokens().unwrap().len(), i + 1);
            let mode = fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let mut temp = store.path().as_os_str().to_owned();
        temp.push(".tmp");
        assert!(!Path::new(&temp).exists());
    }

    #[test]
    fn readers_never_see_partial_writes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();

        let reader = {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    store.load().unwrap();
                }
            })
        };

        for i in 0..50 {
            store
                .add_token(Token::new(
                    TokenKind::HDFS_DELEGATION,
                    format!("hdfs://nn{}:8020", i),
                    "x".repeat(4096),
                ))
                .unwrap();
        }

        reader.join().unwrap();
        assert_eq!(store.tokens().unwrap().len(), 50);
    }

    #[test]
    fn stale_temp_file_is_replaced() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.init("alice", Authentication::Kerberos).unwrap();

        let mut temp = store.path().as_os_str().to_owned();
        temp.push(".tmp");
        fs::write(&temp, "{truncated").unwrap();

        store
            .add_token(Token::new(TokenKind::SWEBHDFS, "swebhdfs://nn:9871", "t"))
            .unwrap();

        assert_eq!(store.tokens().unwrap().len(), 1);
        assert!(!Path::new(&temp).exists());
    }
}
