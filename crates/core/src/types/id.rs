//! Newtype IDs for type-safe entity references.
//!
//! The GraphQL backend hands out opaque `ID!` values. Use the `define_id!`
//! macro to wrap them so IDs from different entity types cannot be mixed.

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use freightdesk_core::define_id;
/// define_id!(BranchId);
/// define_id!(FleetId);
///
/// let branch_id = BranchId::new("12");
/// let fleet_id = FleetId::new("12");
///
/// // These are different types, so this won't compile:
/// // let _: BranchId = fleet_id;
/// assert_eq!(branch_id.as_str(), fleet_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying opaque value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(RoleId);
define_id!(PermissionId);
define_id!(BranchId);
define_id!(CurrencyId);
define_id!(FleetTypeId);
define_id!(PositionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = BranchId::new("42");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"42\""));
    }

    #[test]
    fn test_id_display_matches_inner_value() {
        let id = UserId::from("u-7");
        assert_eq!(id.to_string(), "u-7");
        assert_eq!(String::from(id), "u-7");
    }
}
