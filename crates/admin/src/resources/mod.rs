//! Administered resources.
//!
//! Every screen of the panel is an instance of the same pattern: a table
//! with URL-synced state, a create/update form and delete dialogs, all backed
//! by six GraphQL documents. A [`Resource`] supplies the parts that differ.

pub mod branches;
pub mod currencies;
pub mod fleet_types;
pub mod positions;

pub use branches::Branch;
pub use currencies::Currency;
pub use fleet_types::FleetType;
pub use positions::Position;

use freightdesk_core::FieldErrors;
use freightdesk_core::table::{ProcessingMode, TableRow, TableUrlState};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::components::{DataTableConfig, FormField, FormValues};
use crate::graphql::documents::CrudDocuments;

/// A CRUD resource backed by the GraphQL API.
pub trait Resource: TableRow + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Mutation input sent for create and update.
    type Input: Serialize + Send + Sync;

    /// Lower-case singular, used in messages ("branch").
    const SINGULAR: &'static str;
    /// URL segment ("branches").
    const PLURAL: &'static str;
    /// Capitalized singular ("Branch").
    const LABEL: &'static str;
    /// Page title ("Branches").
    const TITLE: &'static str;
    /// Where filtering, sorting and pagination happen.
    const MODE: ProcessingMode;
    const DOCUMENTS: CrudDocuments;
    /// Form fields, in display order.
    const FORM: &'static [FormField];
    /// Columns the global filter searches in client mode.
    const SEARCHABLE: &'static [&'static str] = &[];

    /// Table layout.
    fn table() -> DataTableConfig;

    /// Current values, to prefill the update form.
    fn form_values(&self) -> FormValues;

    /// Check submitted values and build the mutation input.
    ///
    /// # Errors
    ///
    /// Returns the field errors to show inline.
    fn validate(values: &FormValues) -> Result<Self::Input, FieldErrors>;

    /// List variables for active column filters (manual mode only).
    fn filter_variables(_state: &TableUrlState) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    /// Index path of the resource.
    #[must_use]
    fn path() -> String {
        format!("/{}", Self::PLURAL)
    }

    /// Form field names, for mapping backend validation errors.
    #[must_use]
    fn field_names() -> Vec<&'static str> {
        Self::FORM.iter().map(|f| f.name).collect()
    }
}

/// Empty form values become `None`.
pub(crate) fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" +31 10 "), Some("+31 10".to_string()));
    }

    #[test]
    fn test_paths_and_field_names() {
        assert_eq!(Branch::path(), "/branches");
        assert_eq!(FleetType::path(), "/fleet-types");
        assert!(Currency::field_names().contains(&"exchange_rate"));
    }
}
