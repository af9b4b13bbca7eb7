//! File-backed session storage.
//!
//! The CLI keeps its session in a small JSON object on disk so that one
//! `fd-cli login` serves every later command.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use freightdesk_admin::services::{SessionStorage, StorageError};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Session storage in a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `~/.freightdesk/session.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".freightdesk").join("session.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if values.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // The file holds a bearer token: write a private temporary file and
        // move it into place so the token is never readable by others.
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::remove_file(&tmp).await
            && e.kind() != ErrorKind::NotFound
        {
            return Err(e.into());
        }
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&tmp).await?;
        file.write_all(&serde_json::to_vec_pretty(values)?).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read().await?;
        values.insert(key.to_string(), value);
        self.write(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read().await?;
        if values.remove(key).is_some() {
            self.write(&values).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freightdesk_admin::services::SessionService;

    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::new(&path);
        storage.set("access_token", "tok-1".to_string()).await.unwrap();
        storage.set("other", "x".to_string()).await.unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("access_token").await.unwrap().as_deref(), Some("tok-1"));
        assert_eq!(reopened.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_removing_last_key_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::new(&path);
        storage.set("access_token", "tok-1".to_string()).await.unwrap();
        assert!(path.exists());

        storage.remove("access_token").await.unwrap();
        assert!(!path.exists());

        // Removing again is fine.
        storage.remove("access_token").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileStorage::new(&path)
            .set("access_token", "tok-1".to_string())
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rewrite_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FileStorage::new(&path)
            .set("access_token", "tok-2".to_string())
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_session_service_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let service = SessionService::load(FileStorage::new(&path)).await.unwrap();
        service.set_access_token("tok-9").await.unwrap();

        let reloaded = SessionService::load(FileStorage::new(&path)).await.unwrap();
        assert_eq!(reloaded.access_token().as_deref(), Some("tok-9"));
        assert!(!reloaded.is_authenticated());

        reloaded.reset().await.unwrap();
        assert!(!path.exists());
    }
}
