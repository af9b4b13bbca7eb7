//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::graphql::ApiClient;

/// Application state shared across all handlers.
///
/// Holds no session data; sessions live in the session layer and are bound
/// to a request through the `CurrentSession` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = ApiClient::new(&config.api);
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
