//! Branches: company offices and depots. Server-side paginated.

use freightdesk_core::table::{ProcessingMode, TableRow, TableUrlState};
use freightdesk_core::{BranchId, FieldErrors};
use serde::{Deserialize, Serialize};

use super::{Resource, optional};
use crate::components::form::value;
use crate::components::{
    BulkAction, DataTableConfig, FieldKind, FilterOption, FormField, FormValues, TableColumn,
    TableFilter,
};
use crate::crud_documents;
use crate::graphql::documents::CrudDocuments;

const STATUSES: &[(&str, &str)] = &[("ACTIVE", "Active"), ("INACTIVE", "Inactive")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchStatus {
    Active,
    Inactive,
}

impl BranchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: BranchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInput {
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: BranchStatus,
}

impl TableRow for Branch {
    fn row_id(&self) -> String {
        self.id.to_string()
    }

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "code" => Some(self.code.clone()),
            "address" => self.address.clone(),
            "phone" => self.phone.clone(),
            "status" => Some(self.status.label().to_string()),
            _ => None,
        }
    }
}

impl Resource for Branch {
    type Input = BranchInput;

    const SINGULAR: &'static str = "branch";
    const PLURAL: &'static str = "branches";
    const LABEL: &'static str = "Branch";
    const TITLE: &'static str = "Branches";
    const MODE: ProcessingMode = ProcessingMode::Manual;
    const DOCUMENTS: CrudDocuments = crud_documents! {
        paginated {
            list: "branches",
            single: "branch",
            create: "createBranch",
            update: "updateBranch",
            delete: "deleteBranch",
            bulk_delete: "deleteBranches",
            input: "BranchInput",
            filter_variables: ", $status: [BranchStatus!]",
            filter_arguments: ", status: $status",
            fields: "id name code address phone status",
        }
    };
    const FORM: &'static [FormField] = &[
        FormField::text("name", "Name").required().placeholder("Rotterdam Port"),
        FormField::text("code", "Code").required().placeholder("RTM"),
        FormField::text("address", "Address").kind(FieldKind::TextArea),
        FormField::text("phone", "Phone"),
        FormField::text("status", "Status")
            .kind(FieldKind::Select(STATUSES))
            .required(),
    ];

    fn table() -> DataTableConfig {
        DataTableConfig::new("branches")
            .column(TableColumn::sortable("name", "Name"))
            .column(TableColumn::sortable("code", "Code"))
            .column(TableColumn::new("address", "Address").visible(false))
            .column(TableColumn::new("phone", "Phone"))
            .column(TableColumn::new("status", "Status"))
            .filter(TableFilter::multi_select(
                "status",
                "Status",
                STATUSES
                    .iter()
                    .map(|&(v, l)| FilterOption::new(v, l))
                    .collect(),
            ))
            .bulk_action(BulkAction::new("bulk-delete", "Delete selected", "ph-trash").destructive())
            .search_placeholder("Search branches by name or code...")
            .empty_state(
                "ph-buildings",
                "No branches found",
                Some("Try adjusting your search or filters"),
            )
    }

    fn form_values(&self) -> FormValues {
        FormValues::from([
            ("name".to_string(), self.name.clone()),
            ("code".to_string(), self.code.clone()),
            ("address".to_string(), self.address.clone().unwrap_or_default()),
            ("phone".to_string(), self.phone.clone().unwrap_or_default()),
            ("status".to_string(), self.status.as_str().to_string()),
        ])
    }

    fn validate(values: &FormValues) -> Result<BranchInput, FieldErrors> {
        let name = value(values, "name");
        let code = value(values, "code").to_ascii_uppercase();
        let address = value(values, "address");
        let phone = value(values, "phone");
        let status = value(values, "status");

        let mut errors = FieldErrors::new();
        errors
            .required("name", "name", name)
            .max_length("name", "name", name, 255)
            .required("code", "code", &code)
            .max_length("code", "code", &code, 10)
            .max_length("phone", "phone", phone, 32)
            .required("status", "status", status)
            .one_of("status", "status", status, &["ACTIVE", "INACTIVE"]);
        errors.into_result()?;

        Ok(BranchInput {
            name: name.to_string(),
            code,
            address: optional(address),
            phone: optional(phone),
            status: BranchStatus::parse(status).unwrap_or(BranchStatus::Active),
        })
    }

    fn filter_variables(state: &TableUrlState) -> serde_json::Map<String, serde_json::Value> {
        let mut variables = serde_json::Map::new();
        let statuses: Vec<&str> = state
            .filter_values("status")
            .iter()
            .filter_map(|s| BranchStatus::parse(s))
            .map(BranchStatus::as_str)
            .collect();
        if !statuses.is_empty() {
            variables.insert("status".to_string(), serde_json::json!(statuses));
        }
        variables
    }
}
