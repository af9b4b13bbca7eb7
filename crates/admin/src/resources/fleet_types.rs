//! Fleet types: vehicle categories with a nominal payload.

use freightdesk_core::table::{ProcessingMode, TableRow};
use freightdesk_core::{FieldErrors, FleetTypeId};
use serde::{Deserialize, Serialize};

use super::{Resource, optional};
use crate::components::form::value;
use crate::components::{BulkAction, DataTableConfig, FieldKind, FormField, FormValues, TableColumn};
use crate::crud_documents;
use crate::graphql::documents::CrudDocuments;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetType {
    pub id: FleetTypeId,
    pub name: String,
    pub description: Option<String>,
    /// Nominal payload in kilograms.
    pub capacity_kg: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetTypeInput {
    pub name: String,
    pub description: Option<String>,
    pub capacity_kg: Option<u32>,
}

impl TableRow for FleetType {
    fn row_id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "description" => self.description.clone(),
            "capacity_kg" => self.capacity_kg.map(|kg| kg.to_string()),
            _ => None,
        }
    }
}

impl Resource for FleetType {
    type Input = FleetTypeInput;

    const SINGULAR: &'static str = "fleet type";
    const PLURAL: &'static str = "fleet-types";
    const LABEL: &'static str = "Fleet type";
    const TITLE: &'static str = "Fleet types";
    const MODE: ProcessingMode = ProcessingMode::Manual;
    const DOCUMENTS: CrudDocuments = crud_documents! {
        paginated {
            list: "fleetTypes",
            single: "fleetType",
            create: "createFleetType",
            update: "updateFleetType",
            delete: "deleteFleetType",
            bulk_delete: "deleteFleetTypes",
            input: "FleetTypeInput",
            filter_variables: "",
            filter_arguments: "",
            fields: "id name description capacityKg",
        }
    };
    const FORM: &'static [FormField] = &[
        FormField::text("name", "Name").required().placeholder("Curtainsider"),
        FormField::text("description", "Description").kind(FieldKind::TextArea),
        FormField::text("capacity_kg", "Capacity (kg)")
            .kind(FieldKind::Number)
            .placeholder("24000"),
    ];

    fn table() -> DataTableConfig {
        DataTableConfig::new("fleet-types")
            .column(TableColumn::sortable("name", "Name"))
            .column(TableColumn::new("description", "Description"))
            .column(TableColumn::sortable("capacity_kg", "Capacity (kg)"))
            .bulk_action(BulkAction::new("bulk-delete", "Delete selected", "ph-trash").destructive())
            .search_placeholder("Search fleet types...")
            .empty_state("ph-truck", "No fleet types found", None)
    }

    fn form_values(&self) -> FormValues {
        FormValues::from([
            ("name".to_string(), self.name.clone()),
            (
                "description".to_string(),
                self.description.clone().unwrap_or_default(),
            ),
            (
                "capacity_kg".to_string(),
                self.capacity_kg.map(|kg| kg.to_string()).unwrap_or_default(),
            ),
        ])
    }

    fn validate(values: &FormValues) -> Result<FleetTypeInput, FieldErrors> {
        let name = value(values, "name");
        let description = value(values, "description");
        let capacity = value(values, "capacity_kg");

        let mut errors = FieldErrors::new();
        errors
            .required("name", "name", name)
            .max_length("name", "name", name, 100)
            .max_length("description", "description", description, 1000);

        let capacity_kg = if capacity.is_empty() {
            None
        } else if let Ok(kg) = capacity.parse::<u32>() {
            Some(kg)
        } else {
            errors.add("capacity_kg", "The capacity must be a whole number of kilograms.");
            None
        };
        errors.into_result()?;

        Ok(FleetTypeInput {
            name: name.to_string(),
            description: optional(description),
            capacity_kg,
        })
    }
}
