//! services/portal/src/adapters/session_file.rs
//!
//! Durable session storage: a small JSON file holding the `token` and `userId`
//! keys. Implements the `SessionStorage` port from the `core` crate.

use async_trait::async_trait;
use legalai_core::domain::Session;
use legalai_core::ports::{PortError, PortResult, SessionStorage};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    #[serde(rename = "userId")]
    user_id: String,
}

pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> PortResult<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        let record: SessionRecord =
            serde_json::from_slice(&bytes).map_err(|e| storage_error(&self.path, e))?;
        Ok(Some(Session::new(record.token, record.user_id)))
    }

    async fn save(&self, session: &Session) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }
        let record = SessionRecord {
            token: session.token.clone(),
            user_id: session.user_id.clone(),
        };
        let json = serde_json::to_vec_pretty(&record).map_err(|e| storage_error(&self.path, e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| storage_error(&self.path, e))?;
        debug!("Session written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.load().await.unwrap(), None);
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));

        storage.save(&Session::new("tok", "user-9")).await.unwrap();
        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"userId\": \"user-9\""));
        assert_eq!(storage.load().await.unwrap(), Some(Session::new("tok", "user-9")));

        storage.clear().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileSessionStorage::new(path).load().await.unwrap_err();
        assert!(matches!(err, PortError::Storage(_)));
    }
}
