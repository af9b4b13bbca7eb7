use std::sync::Arc;

use graphql_client::{QueryBody, Response};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;

use super::{ApiError, classify, documents};

/// FreightDesk GraphQL API client.
///
/// Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL document.
    ///
    /// `token` is sent as `Authorization: Bearer <token>` when present and
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` / `ApiError::Forbidden` for HTTP
    /// 401/403 or authentication-class GraphQL errors, `ApiError::Validation`
    /// for rejected input and `ApiError::Http` / `ApiError::Parse` for
    /// transport failures.
    #[instrument(skip(self, body, token), fields(operation = body.operation_name))]
    pub async fn execute<V, T>(&self, body: &QueryBody<V>, token: Option<&str>) -> Result<T, ApiError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut request = self.inner.client.post(self.inner.endpoint.clone()).json(body);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => {
                return Err(ApiError::Unauthenticated(
                    "Invalid or expired access token".to_string(),
                ));
            }
            StatusCode::FORBIDDEN => {
                return Err(ApiError::Forbidden("Access denied".to_string()));
            }
            _ => {}
        }

        let bytes = response.bytes().await?;
        let envelope: Response<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(ApiError::Status(status.as_u16())),
            Err(e) => return Err(ApiError::Parse(e)),
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let error = classify(errors);
            tracing::debug!(error = %error, "GraphQL request failed");
            return Err(error);
        }

        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Check that the backend answers GraphQL at all.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError` if the backend is unreachable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let body = documents::body(
            documents::PING,
            documents::operation::PING,
            documents::NoVariables {},
        );
        self.execute::<_, serde_json::Value>(&body, None).await?;
        Ok(())
    }
}
