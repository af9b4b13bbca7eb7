//! Session service.
//!
//! Holds the current [`Session`] in memory, mirrors it into durable
//! [`SessionStorage`] under two keys (`access_token` and `user`), and lets
//! consumers subscribe to changes instead of polling.
//!
//! The admin panel stores sessions in `tower_sessions::Session`; the CLI
//! stores them in a JSON file. Both go through the same service.

use std::future::Future;

use freightdesk_core::session::keys;
use freightdesk_core::{Session, User};
use thiserror::Error;
use tokio::sync::watch;

/// Errors raised by a [`SessionStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Server-side session store failed.
    #[error("Session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// File-backed storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable string key/value storage for session data.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl SessionStorage for tower_sessions::Session {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(Self::get::<String>(self, key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.insert(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::remove::<String>(self, key).await?;
        Ok(())
    }
}

/// Session state backed by durable storage.
pub struct SessionService<S> {
    storage: S,
    state: watch::Sender<Session>,
}

impl<S: SessionStorage> SessionService<S> {
    /// Restore the session persisted in `storage`.
    ///
    /// A stored user that no longer deserializes is dropped from storage and
    /// treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage backend fails.
    pub async fn load(storage: S) -> Result<Self, StorageError> {
        let access_token = storage.get(keys::ACCESS_TOKEN).await?.unwrap_or_default();
        let user = match storage.get(keys::USER).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable stored user");
                    storage.remove(keys::USER).await?;
                    None
                }
            },
            None => None,
        };

        let (state, _) = watch::channel(Session { user, access_token });
        Ok(Self { storage, state })
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Whether a user is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// The bearer token, if one is held.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_owned)
    }

    /// Receive every future session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Replace the user. `None` removes the stored user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user cannot be persisted.
    pub async fn set_user(&self, user: Option<User>) -> Result<(), StorageError> {
        match &user {
            Some(user) => {
                self.storage
                    .set(keys::USER, serde_json::to_string(user)?)
                    .await?;
            }
            None => self.storage.remove(keys::USER).await?,
        }
        self.state.send_if_modified(|session| {
            let changed = session.user != user;
            session.user = user;
            changed
        });
        Ok(())
    }

    /// Replace the bearer token. An empty token removes the stored one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be persisted.
    pub async fn set_access_token(&self, token: impl Into<String>) -> Result<(), StorageError> {
        let token = token.into();
        if token.is_empty() {
            self.storage.remove(keys::ACCESS_TOKEN).await?;
        } else {
            self.storage.set(keys::ACCESS_TOKEN, token.clone()).await?;
        }
        self.state.send_if_modified(|session| {
            let changed = session.access_token != token;
            session.access_token = token;
            changed
        });
        Ok(())
    }

    /// Clear user and token from memory and storage.
    ///
    /// Idempotent: a second reset leaves the same empty state and notifies
    /// nobody.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage backend fails.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.storage.remove(keys::ACCESS_TOKEN).await?;
        self.storage.remove(keys::USER).await?;
        self.state.send_if_modified(|session| {
            let changed = *session != Session::default();
            *session = Session::default();
            changed
        });
        Ok(())
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use freightdesk_core::UserId;
    use tower_sessions::MemoryStore;

    use super::*;

    /// In-memory storage for tests.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStorage(Arc<Mutex<HashMap<String, String>>>);

    impl MemoryStorage {
        pub(crate) fn raw(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }
    }

    impl SessionStorage for MemoryStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    pub(crate) fn user() -> User {
        User {
            id: UserId::new("1"),
            name: "Dana Ops".to_string(),
            email: "dana@freightdesk.dev".to_string(),
            roles: vec![],
            permissions: vec![],
        }
    }

    #[tokio::test]
    async fn test_load_empty_storage() {
        let service = SessionService::load(MemoryStorage::default()).await.unwrap();
        assert_eq!(service.session(), Session::default());
        assert!(!service.is_authenticated());
        assert!(service.access_token().is_none());
    }

    #[tokio::test]
    async fn test_login_persists_and_reloads() {
        let storage = MemoryStorage::default();
        let service = SessionService::load(storage.clone()).await.unwrap();
        service.set_access_token("tok-123").await.unwrap();
        service.set_user(Some(user())).await.unwrap();

        assert_eq!(storage.raw(keys::ACCESS_TOKEN).as_deref(), Some("tok-123"));
        assert!(storage.raw(keys::USER).is_some());

        let reloaded = SessionService::load(storage).await.unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.access_token().as_deref(), Some("tok-123"));
        assert_eq!(reloaded.session().user, Some(user()));
    }

    #[tokio::test]
    async fn test_set_user_none_clears_storage() {
        let storage = MemoryStorage::default();
        let service = SessionService::load(storage.clone()).await.unwrap();
        service.set_user(Some(user())).await.unwrap();
        service.set_user(None).await.unwrap();
        assert!(storage.raw(keys::USER).is_none());
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let storage = MemoryStorage::default();
        let service = SessionService::load(storage.clone()).await.unwrap();
        service.set_access_token("tok").await.unwrap();
        service.set_user(Some(user())).await.unwrap();

        service.reset().await.unwrap();
        let once = service.session();
        service.reset().await.unwrap();

        assert_eq!(service.session(), once);
        assert_eq!(once, Session::default());
        assert!(storage.raw(keys::ACCESS_TOKEN).is_none());
        assert!(storage.raw(keys::USER).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let service = SessionService::load(MemoryStorage::default()).await.unwrap();
        let mut rx = service.subscribe();

        service.set_user(Some(user())).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        service.reset().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());

        // Nothing left to clear, nothing to announce.
        service.reset().await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_user_is_discarded() {
        let storage = MemoryStorage::default();
        storage.set(keys::USER, "{not json".to_string()).await.unwrap();
        let service = SessionService::load(storage.clone()).await.unwrap();
        assert!(!service.is_authenticated());
        assert!(storage.raw(keys::USER).is_none());
    }

    #[tokio::test]
    async fn test_tower_session_storage() {
        let session = tower_sessions::Session::new(None, Arc::new(MemoryStore::default()), None);
        SessionStorage::set(&session, keys::ACCESS_TOKEN, "abc".to_string())
            .await
            .unwrap();
        assert_eq!(
            SessionStorage::get(&session, keys::ACCESS_TOKEN).await.unwrap().as_deref(),
            Some("abc")
        );
        SessionStorage::remove(&session, keys::ACCESS_TOKEN).await.unwrap();
        assert!(SessionStorage::get(&session, keys::ACCESS_TOKEN).await.unwrap().is_none());
    }
}
