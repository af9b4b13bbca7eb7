//! Session and user read model.
//!
//! The session is the pair of the logged-in user and the bearer token used for
//! outbound GraphQL requests. The user is an opaque read model: roles and
//! permissions are kept exactly as the backend returned them.

use serde::{Deserialize, Serialize};

use crate::types::{PermissionId, RoleId, UserId};

/// Durable storage keys for session data.
pub mod keys {
    /// Key for the bearer token string.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the JSON-serialized [`super::User`].
    pub const USER: &str = "user";
}

/// A role assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// A permission granted to a user (directly or through a role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
}

/// The authenticated user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl User {
    /// Whether the backend granted a permission with this name.
    #[must_use]
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.name == permission)
    }

    /// Whether the user holds a role with this name.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }
}

/// Current session state.
///
/// `access_token` is non-empty only between a successful login and the next
/// logout. Token expiry is never tracked here; the backend rejecting the token
/// is the only signal that it went stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: String,
}

impl Session {
    /// The guard's authentication predicate: a user is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The bearer token, if one is held.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        (!self.access_token.is_empty()).then_some(self.access_token.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dispatcher() -> User {
        User {
            id: UserId::new("1"),
            name: "Dana Dispatcher".to_string(),
            email: "dana@freightdesk.dev".to_string(),
            roles: vec![Role {
                id: RoleId::new("2"),
                name: "dispatcher".to_string(),
            }],
            permissions: vec![Permission {
                id: PermissionId::new("9"),
                name: "branches.view".to_string(),
            }],
        }
    }

    #[test]
    fn test_default_session_is_logged_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_user_presence_is_the_auth_predicate() {
        let session = Session {
            user: Some(dispatcher()),
            access_token: String::new(),
        };
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_user_permissions_and_roles() {
        let user = dispatcher();
        assert!(user.can("branches.view"));
        assert!(!user.can("branches.delete"));
        assert!(user.has_role("dispatcher"));
    }

    #[test]
    fn test_user_deserializes_without_collections() {
        let user: User =
            serde_json::from_str(r#"{"id":"5","name":"Sam","email":"sam@freightdesk.dev"}"#)
                .unwrap();
        assert!(user.roles.is_empty());
        assert!(user.permissions.is_empty());
    }
}
