//! FreightDesk GraphQL API client.
//!
//! # Architecture
//!
//! - Request and response envelopes come from `graphql_client`
//!   (`QueryBody` / `Response`); documents are plain `&'static str`
//! - Requests are sent with `reqwest` directly, with `Authorization: Bearer`
//!   when the caller holds a token
//! - Backend errors are classified by their `extensions.category` so callers
//!   can tell authentication failures from field validation
//!
//! # Example
//!
//! ```rust,ignore
//! use freightdesk_admin::graphql::{ApiClient, documents};
//!
//! let client = ApiClient::new(&config.api);
//! let me: MeData = client
//!     .execute(&documents::me(), Some(token))
//!     .await?;
//! ```

mod client;
pub mod documents;

pub use client::ApiClient;

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that can occur when calling the GraphQL API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status and no GraphQL payload.
    #[error("Unexpected status {0}")]
    Status(u16),

    /// Response body was not a GraphQL envelope of the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Token missing, expired or rejected.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Token valid but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input rejected; messages keyed by backend input path.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// Any other GraphQL error.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    /// Envelope carried neither data nor errors.
    #[error("No data in response")]
    MissingData,
}

impl ApiError {
    /// Authentication-class failures end the session.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::Forbidden(_))
    }

    /// Failures worth reporting to Sentry: the backend or the wire misbehaved.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status(_) | Self::Parse(_) | Self::MissingData
        )
    }
}

/// Error categories reported in `extensions.category`.
mod category {
    pub const AUTHENTICATION: &str = "authentication";
    pub const AUTHORIZATION: &str = "authorization";
    pub const VALIDATION: &str = "validation";
}

/// Turn a non-empty error list into one [`ApiError`].
///
/// Authentication wins over authorization, which wins over validation; all
/// validation errors are merged into a single field map.
pub(crate) fn classify(errors: Vec<graphql_client::Error>) -> ApiError {
    let category_of = |error: &graphql_client::Error| {
        error
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("category"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    };

    if let Some(error) = errors
        .iter()
        .find(|e| category_of(e).as_deref() == Some(category::AUTHENTICATION))
    {
        return ApiError::Unauthenticated(error.message.clone());
    }
    if let Some(error) = errors
        .iter()
        .find(|e| category_of(e).as_deref() == Some(category::AUTHORIZATION))
    {
        return ApiError::Forbidden(error.message.clone());
    }

    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut message = None;
    for error in &errors {
        if category_of(error).as_deref() != Some(category::VALIDATION) {
            continue;
        }
        message.get_or_insert_with(|| error.message.clone());
        let Some(validation) = error
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("validation"))
            .and_then(serde_json::Value::as_object)
        else {
            continue;
        };
        for (key, messages) in validation {
            let entry = fields.entry(key.clone()).or_default();
            match messages {
                serde_json::Value::Array(items) => entry.extend(
                    items
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .map(str::to_owned),
                ),
                serde_json::Value::String(single) => entry.push(single.clone()),
                _ => {}
            }
        }
    }
    if let Some(message) = message {
        return ApiError::Validation { message, fields };
    }

    ApiError::GraphQL(errors.into_iter().map(|e| e.message).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn errors(json: serde_json::Value) -> Vec<graphql_client::Error> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_authentication_category() {
        let err = classify(errors(serde_json::json!([
            {"message": "Unauthenticated.", "extensions": {"category": "authentication"}}
        ])));
        assert!(matches!(err, ApiError::Unauthenticated(ref m) if m == "Unauthenticated."));
        assert!(err.is_auth());
    }

    #[test]
    fn test_authentication_wins_over_other_errors() {
        let err = classify(errors(serde_json::json!([
            {"message": "Something broke"},
            {"message": "This action is unauthorized.", "extensions": {"category": "authorization"}},
            {"message": "Unauthenticated.", "extensions": {"category": "authentication"}}
        ])));
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn test_authorization_category() {
        let err = classify(errors(serde_json::json!([
            {"message": "This action is unauthorized.", "extensions": {"category": "authorization"}}
        ])));
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(err.is_auth());
    }

    #[test]
    fn test_validation_fields_are_collected() {
        let err = classify(errors(serde_json::json!([
            {
                "message": "Validation failed for the field [createCurrency].",
                "extensions": {
                    "category": "validation",
                    "validation": {
                        "input.code": ["The code has already been taken."],
                        "input.exchangeRate": ["The exchange rate must be a number."]
                    }
                }
            }
        ])));
        let ApiError::Validation { message, fields } = err else {
            panic!("expected validation error");
        };
        assert!(message.starts_with("Validation failed"));
        assert_eq!(fields["input.code"], vec!["The code has already been taken."]);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_uncategorized_errors() {
        let err = classify(errors(serde_json::json!([
            {"message": "Field not found"},
            {"message": "Invalid ID"}
        ])));
        assert_eq!(err.to_string(), "GraphQL errors: Field not found; Invalid ID");
        assert!(!err.is_auth());
        assert!(!err.is_server_fault());
    }
}
