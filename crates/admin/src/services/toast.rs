//! Toast notifications.
//!
//! Toasts are queued in the server-side session and drained by the next page
//! render, so a message survives the redirect that usually follows a
//! mutation.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::StorageError;

/// Session key holding the queued toasts.
pub const TOASTS_KEY: &str = "toasts";

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

/// Queue a toast for the next render.
///
/// # Errors
///
/// Returns `StorageError` if the session store fails.
pub async fn push(session: &Session, toast: Toast) -> Result<(), StorageError> {
    let mut queued: Vec<Toast> = session.get(TOASTS_KEY).await?.unwrap_or_default();
    queued.push(toast);
    session.insert(TOASTS_KEY, queued).await?;
    Ok(())
}

/// Remove and return every queued toast.
///
/// Store failures are logged and yield no toasts; a toast is never worth
/// failing a page render for.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(TOASTS_KEY).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read queued toasts");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_toasts_queue_in_order_and_drain_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push(&session, Toast::success("Branch created")).await.unwrap();
        push(&session, Toast::error("Something went wrong")).await.unwrap();

        let toasts = take(&session).await;
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].message, "Branch created");
        assert_eq!(toasts[1].kind, ToastKind::Error);

        assert!(take(&session).await.is_empty());
    }

    #[test]
    fn test_toast_kind_css() {
        assert_eq!(Toast::info("x").kind.as_str(), "info");
    }
}
