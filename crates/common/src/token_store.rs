//! Persistent session token storage.
//!
//! The browser client keeps the bearer token in `localStorage` under the
//! key `token`; this is the file-backed equivalent. Only the login and
//! logout paths write to it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Key under which the token is stored.
const TOKEN_KEY: &str = "token";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
}

/// File-backed store for the session bearer token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store persisting to the given path.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted token, if any.
    ///
    /// A missing or unreadable store is treated as an absent session rather
    /// than an error.
    pub async fn load(&self) -> Option<String> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) => session.token,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt session store");
                None
            }
        }
    }

    /// Persist the given token.
    pub async fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Config(format!("Failed to create session directory: {e}")))?;
        }

        let session = StoredSession {
            token: Some(token.to_string()),
        };
        let raw = serde_json::to_string(&session)
            .map_err(|e| AppError::Config(format!("Failed to encode session: {e}")))?;

        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| AppError::Config(format!("Failed to write session store: {e}")))?;
        Ok(())
    }

    /// Remove the persisted token.
    pub async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Config(format!(
                "Failed to clear session store: {e}"
            ))),
        }
    }

    /// The storage key, fixed for compatibility with the browser client.
    #[must_use]
    pub const fn key() -> &'static str {
        TOKEN_KEY
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("youmatter-test-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn test_save_load_clear_roundtrip() {
        let store = TokenStore::new(temp_path("roundtrip"));

        assert_eq!(store.load().await, None);

        store.save("abc123").await.unwrap();
        assert_eq!(store.load().await, Some("abc123".to_string()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = TokenStore::new(temp_path("idempotent"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_store_reads_as_absent() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = TokenStore::new(&path);
        assert_eq!(store.load().await, None);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
