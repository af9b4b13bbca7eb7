//! Positions: job titles employees are hired into, grouped by department.

use freightdesk_core::table::{ProcessingMode, TableRow, TableUrlState};
use freightdesk_core::{FieldErrors, PositionId};
use serde::{Deserialize, Serialize};

use super::{Resource, optional};
use crate::components::form::value;
use crate::components::{
    BulkAction, DataTableConfig, FieldKind, FilterOption, FormField, FormValues, TableColumn,
    TableFilter,
};
use crate::crud_documents;
use crate::graphql::documents::CrudDocuments;

const DEPARTMENTS: &[(&str, &str)] = &[
    ("OPERATIONS", "Operations"),
    ("SALES", "Sales"),
    ("FINANCE", "Finance"),
    ("ADMINISTRATION", "Administration"),
];

fn department_label(department: &str) -> &str {
    DEPARTMENTS
        .iter()
        .find(|(value, _)| *value == department)
        .map_or(department, |(_, label)| *label)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub department: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionInput {
    pub name: String,
    pub department: String,
    pub description: Option<String>,
}

impl TableRow for Position {
    fn row_id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "department" => Some(department_label(&self.department).to_string()),
            "description" => self.description.clone(),
            _ => None,
        }
    }
}

impl Resource for Position {
    type Input = PositionInput;

    const SINGULAR: &'static str = "position";
    const PLURAL: &'static str = "positions";
    const LABEL: &'static str = "Position";
    const TITLE: &'static str = "Positions";
    const MODE: ProcessingMode = ProcessingMode::Manual;
    const DOCUMENTS: CrudDocuments = crud_documents! {
        paginated {
            list: "positions",
            single: "position",
            create: "createPosition",
            update: "updatePosition",
            delete: "deletePosition",
            bulk_delete: "deletePositions",
            input: "PositionInput",
            filter_variables: ", $department: [Department!]",
            filter_arguments: ", department: $department",
            fields: "id name department description",
        }
    };
    const FORM: &'static [FormField] = &[
        FormField::text("name", "Name").required().placeholder("Dispatcher"),
        FormField::text("department", "Department")
            .kind(FieldKind::Select(DEPARTMENTS))
            .required(),
        FormField::text("description", "Description").kind(FieldKind::TextArea),
    ];

    fn table() -> DataTableConfig {
        DataTableConfig::new("positions")
            .column(TableColumn::sortable("name", "Name"))
            .column(TableColumn::sortable("department", "Department"))
            .column(TableColumn::new("description", "Description").visible(false))
            .filter(TableFilter::multi_select(
                "department",
                "Department",
                DEPARTMENTS
                    .iter()
                    .map(|&(v, l)| FilterOption::new(v, l))
                    .collect(),
            ))
            .bulk_action(BulkAction::new("bulk-delete", "Delete selected", "ph-trash").destructive())
            .search_placeholder("Search positions...")
            .empty_state(
                "ph-identification-badge",
                "No positions found",
                Some("Try adjusting your search or filters"),
            )
    }

    fn form_values(&self) -> FormValues {
        FormValues::from([
            ("name".to_string(), self.name.clone()),
            ("department".to_string(), self.department.clone()),
            (
                "description".to_string(),
                self.description.clone().unwrap_or_default(),
            ),
        ])
    }

    fn validate(values: &FormValues) -> Result<PositionInput, FieldErrors> {
        let name = value(values, "name");
        let department = value(values, "department");
        let description = value(values, "description");
        let allowed: Vec<&str> = DEPARTMENTS.iter().map(|(v, _)| *v).collect();

        let mut errors = FieldErrors::new();
        errors
            .required("name", "name", name)
            .max_length("name", "name", name, 100)
            .required("department", "department", department)
            .one_of("department", "department", department, &allowed)
            .max_length("description", "description", description, 1000);
        errors.into_result()?;

        Ok(PositionInput {
            name: name.to_string(),
            department: department.to_string(),
            description: optional(description),
        })
    }

    fn filter_variables(state: &TableUrlState) -> serde_json::Map<String, serde_json::Value> {
        let mut variables = serde_json::Map::new();
        let departments: Vec<&str> = state
            .filter_values("department")
            .iter()
            .map(String::as_str)
            .filter(|d| DEPARTMENTS.iter().any(|(value, _)| value == d))
            .collect();
        if !departments.is_empty() {
            variables.insert("department".to_string(), serde_json::json!(departments));
        }
        variables
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freightdesk_core::table::{ColumnFilter, Pagination};

    use super::*;

    #[test]
    fn test_department_label() {
        let position = Position {
            id: PositionId::new("1"),
            name: "Dispatcher".to_string(),
            department: "OPERATIONS".to_string(),
            description: None,
        };
        assert_eq!(position.cell("department").as_deref(), Some("Operations"));
        assert_eq!(department_label("LEGAL"), "LEGAL");
    }

    #[test]
    fn test_validate_department() {
        let mut values = FormValues::from([
            ("name".to_string(), "Dispatcher".to_string()),
            ("department".to_string(), "LEGAL".to_string()),
        ]);
        let errors = Position::validate(&values).unwrap_err();
        assert_eq!(
            errors.first("department"),
            Some("The selected department is invalid.")
        );

        values.insert("department".to_string(), "SALES".to_string());
        assert_eq!(Position::validate(&values).unwrap().department, "SALES");
    }

    #[test]
    fn test_filter_variables_drop_unknown_departments() {
        let state = TableUrlState {
            pagination: Pagination {
                page_index: 0,
                page_size: 10,
            },
            global_filter: String::new(),
            column_filters: vec![ColumnFilter::new("department", &["SALES", "LEGAL"])],
            sorting: vec![],
        };
        assert_eq!(
            Position::filter_variables(&state)["department"],
            serde_json::json!(["SALES"])
        );
    }
}
