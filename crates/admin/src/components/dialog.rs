//! Create, update and delete dialogs.

use freightdesk_core::FieldErrors;
use freightdesk_core::dialog::DialogState;
use freightdesk_core::table::TableRow;
use serde::Serialize;

use super::form::{FormValues, FormView};
use crate::resources::Resource;

/// A row named in a delete confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct DialogRowView {
    pub id: String,
    pub label: String,
}

/// Render model of the open dialog.
#[derive(Debug, Clone, Serialize)]
pub struct DialogView {
    /// `create`, `update`, `delete` or `bulk-delete`.
    pub kind: &'static str,
    pub title: String,
    pub description: Option<String>,
    /// Set for create and update.
    pub form: Option<FormView>,
    /// Target of the confirm button for deletes.
    pub action: String,
    pub confirm_label: String,
    pub rows: Vec<DialogRowView>,
    /// Table location to come back to; closing the dialog links here.
    pub return_to: String,
}

impl DialogView {
    /// `None` when `state` is closed.
    ///
    /// `values` overrides the prefilled form after a rejected submission.
    #[must_use]
    pub fn build<R: Resource>(
        state: &DialogState<R>,
        return_to: &str,
        values: Option<&FormValues>,
        errors: &FieldErrors,
    ) -> Option<Self> {
        let path = R::path();
        let empty = FormValues::new();

        let view = match state {
            DialogState::Closed => return None,
            DialogState::Creating => Self {
                kind: "create",
                title: format!("New {}", R::SINGULAR),
                description: None,
                form: Some(FormView::build(
                    R::FORM,
                    path.clone(),
                    format!("Create {}", R::SINGULAR),
                    values.unwrap_or(&empty),
                    errors,
                )),
                action: path,
                confirm_label: format!("Create {}", R::SINGULAR),
                rows: Vec::new(),
                return_to: return_to.to_string(),
            },
            DialogState::Editing(row) => {
                let action = format!("{path}/{}", row.row_id());
                let current = row.form_values();
                Self {
                    kind: "update",
                    title: format!("Edit {}", R::SINGULAR),
                    description: Some(label(row)),
                    form: Some(FormView::build(
                        R::FORM,
                        action.clone(),
                        "Save changes",
                        values.unwrap_or(&current),
                        errors,
                    )),
                    action,
                    confirm_label: "Save changes".to_string(),
                    rows: Vec::new(),
                    return_to: return_to.to_string(),
                }
            }
            DialogState::Deleting(row) => Self {
                kind: "delete",
                title: format!("Delete {}?", R::SINGULAR),
                description: Some(format!(
                    "\"{}\" will be permanently deleted. This cannot be undone.",
                    label(row)
                )),
                form: None,
                action: format!("{path}/{}/delete", row.row_id()),
                confirm_label: "Delete".to_string(),
                rows: vec![row_view(row)],
                return_to: return_to.to_string(),
            },
            DialogState::BulkDeleting(rows) => Self {
                kind: "bulk-delete",
                title: format!("Delete {}?", count_label::<R>(rows.len())),
                description: Some("The following will be permanently deleted.".to_string()),
                form: None,
                action: format!("{path}/bulk-delete"),
                confirm_label: format!("Delete {}", rows.len()),
                rows: rows.iter().map(row_view).collect(),
                return_to: return_to.to_string(),
            },
        };
        Some(view)
    }
}

/// "1 branch", "3 branches".
#[must_use]
pub fn count_label<R: Resource>(count: usize) -> String {
    if count == 1 {
        format!("1 {}", R::SINGULAR)
    } else {
        format!("{count} {}", R::TITLE.to_lowercase())
    }
}

fn label<R: TableRow>(row: &R) -> String {
    row.cell("name").unwrap_or_else(|| row.row_id())
}

fn row_view<R: TableRow>(row: &R) -> DialogRowView {
    DialogRowView {
        id: row.row_id(),
        label: label(row),
    }
}
