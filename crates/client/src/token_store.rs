//! Persistence for the access/refresh token pair.
//!
//! Tokens are stored under the fixed keys `auth_token` and `refresh_token`.
//! There is no schema versioning; the store is a side effect of session
//! changes, never the source of truth while the process runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::TokenStoreError;

/// The persisted pair. Either value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "auth_token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    /// A session counts as authenticated iff an access token is present.
    /// Expiry is not checked here.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Key-value storage for the token pair.
pub trait TokenStore: Send + Sync {
    /// Read whatever was persisted. A missing store is an empty pair.
    fn load(&self) -> Result<StoredTokens, TokenStoreError>;

    /// Overwrite the persisted pair.
    fn save(&self, tokens: &StoredTokens) -> Result<(), TokenStoreError>;

    /// Remove both tokens. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Stores the pair as a small JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(StoredTokens::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(tokens)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with tokens already "persisted", as if from a previous run.
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }

    /// Current contents, for inspection.
    pub fn snapshot(&self) -> StoredTokens {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens, TokenStoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), TokenStoreError> {
        *self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = StoredTokens::default();
        Ok(())
    }
}
