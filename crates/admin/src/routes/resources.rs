//! Generic CRUD screens, mounted once per [`Resource`].
//!
//! The table page is a plain GET: its state (page, size, search, sort,
//! filters, visible columns) and the open dialog live in the query string.
//! Mutations POST and redirect back to the table location they came from, so
//! a successful mutation closes its dialog and the rows are fetched again.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use freightdesk_core::dialog::{DialogKind, DialogState};
use freightdesk_core::guard;
use freightdesk_core::table::{
    RowSelection, SearchParams, TableModel, TableRow, TableStateSync,
};
use freightdesk_core::validation::GENERAL;
use freightdesk_core::FieldErrors;
use tracing::instrument;

use crate::components::data_table::DIALOG_PARAMS;
use crate::components::dialog::{DialogView, count_label};
use crate::components::layout::LayoutView;
use crate::components::{DataTableView, FormValues};
use crate::error::AppError;
use crate::filters;
use crate::graphql::ApiError;
use crate::middleware::RequireAuth;
use crate::resources::Resource;
use crate::services::toast::{self, Toast};
use crate::services::CrudService;
use crate::state::AppState;

/// Hidden form field carrying the table location to return to.
pub const RETURN_TO: &str = "return_to";

#[derive(Template)]
#[template(path = "resources/index.html")]
struct ResourceIndexTemplate {
    layout: LayoutView,
    title: &'static str,
    singular: &'static str,
    table: DataTableView,
    dialog: Option<DialogView>,
}

/// A rejected form submission, shown again in its dialog.
struct Submission<'a> {
    kind: DialogKind,
    id: Option<&'a str>,
    values: FormValues,
    errors: FieldErrors,
}

/// Routes for one resource.
pub fn router<R: Resource>() -> Router<AppState> {
    let path = R::path();
    Router::new()
        .route(&path, get(index::<R>).post(create::<R>))
        .route(&format!("{path}/bulk-delete"), post(bulk_delete::<R>))
        .route(&format!("{path}/{{id}}"), post(update::<R>))
        .route(&format!("{path}/{{id}}/delete"), post(delete::<R>))
}

/// GET /{plural}
#[instrument(skip_all, fields(resource = R::PLURAL))]
async fn index<R: Resource>(
    State(state): State<AppState>,
    auth: RequireAuth,
    uri: Uri,
) -> Result<Response, AppError> {
    render_index::<R>(&state, &auth, uri.query().unwrap_or_default(), None, StatusCode::OK).await
}

/// POST /{plural}
#[instrument(skip_all, fields(resource = R::PLURAL))]
async fn create<R: Resource>(
    State(state): State<AppState>,
    auth: RequireAuth,
    Form(values): Form<FormValues>,
) -> Result<Response, AppError> {
    let return_to = return_location::<R>(values.get(RETURN_TO).map(String::as_str));
    let input = match R::validate(&values) {
        Ok(input) => input,
        Err(errors) => {
            let submission = Submission {
                kind: DialogKind::Create,
                id: None,
                values,
                errors,
            };
            return rerender::<R>(&state, &auth, &return_to, submission).await;
        }
    };

    match CrudService::<R>::new(state.api(), Some(&auth.token)).create(&input).await {
        Ok(created) => {
            tracing::info!(id = %created.row_id(), "Created");
            toast::push(auth.session.storage(), Toast::success(format!("{} created.", R::LABEL)))
                .await?;
            Ok(Redirect::to(&return_to).into_response())
        }
        Err(e) => {
            let submission = Submission {
                kind: DialogKind::Create,
                id: None,
                values,
                errors: FieldErrors::new(),
            };
            mutation_failed::<R>(&state, &auth, &return_to, submission, e).await
        }
    }
}

/// POST /{plural}/{id}
#[instrument(skip(state, auth, values), fields(resource = R::PLURAL))]
async fn update<R: Resource>(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
    Form(values): Form<FormValues>,
) -> Result<Response, AppError> {
    let return_to = return_location::<R>(values.get(RETURN_TO).map(String::as_str));
    let input = match R::validate(&values) {
        Ok(input) => input,
        Err(errors) => {
            let submission = Submission {
                kind: DialogKind::Update,
                id: Some(&id),
                values,
                errors,
            };
            return rerender::<R>(&state, &auth, &return_to, submission).await;
        }
    };

    match CrudService::<R>::new(state.api(), Some(&auth.token)).update(&id, &input).await {
        Ok(_) => {
            toast::push(auth.session.storage(), Toast::success(format!("{} updated.", R::LABEL)))
                .await?;
            Ok(Redirect::to(&return_to).into_response())
        }
        Err(e) => {
            let submission = Submission {
                kind: DialogKind::Update,
                id: Some(&id),
                values,
                errors: FieldErrors::new(),
            };
            mutation_failed::<R>(&state, &auth, &return_to, submission, e).await
        }
    }
}

/// POST /{plural}/{id}/delete
#[instrument(skip(state, auth, values), fields(resource = R::PLURAL))]
async fn delete<R: Resource>(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
    Form(values): Form<FormValues>,
) -> Result<Response, AppError> {
    let return_to = return_location::<R>(values.get(RETURN_TO).map(String::as_str));

    let toast = match CrudService::<R>::new(state.api(), Some(&auth.token)).delete(&id).await {
        Ok(()) => Toast::success(format!("{} deleted.", R::LABEL)),
        Err(e) if e.is_auth() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Delete failed");
            Toast::error(failure_message::<R>(&e, "delete"))
        }
    };
    toast::push(auth.session.storage(), toast).await?;
    Ok(Redirect::to(&return_to).into_response())
}

/// POST /{plural}/bulk-delete
#[instrument(skip_all, fields(resource = R::PLURAL))]
async fn bulk_delete<R: Resource>(
    State(state): State<AppState>,
    auth: RequireAuth,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let return_to = return_location::<R>(
        pairs
            .iter()
            .find(|(key, _)| key == RETURN_TO)
            .map(|(_, value)| value.as_str()),
    );
    let ids: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "ids")
        .map(|(_, id)| id)
        .collect();

    let toast = if ids.is_empty() {
        Toast::info(format!("No {} selected.", R::TITLE.to_lowercase()))
    } else {
        match CrudService::<R>::new(state.api(), Some(&auth.token))
            .bulk_delete(&ids)
            .await
        {
            Ok(count) => Toast::success(format!("Deleted {}.", count_label::<R>(count))),
            Err(e) if e.is_auth() => return Err(e.into()),
            Err(e) => {
                tracing::error!(error = %e, count = ids.len(), "Bulk delete failed");
                Toast::error(failure_message::<R>(&e, "delete"))
            }
        }
    };
    toast::push(auth.session.storage(), toast).await?;
    Ok(Redirect::to(&return_to).into_response())
}

/// Render the table with the dialog named in `query`, or the one a rejected
/// `submission` came from.
async fn render_index<R: Resource>(
    state: &AppState,
    auth: &RequireAuth,
    query: &str,
    submission: Option<Submission<'_>>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let path = R::path();
    let config = R::table();
    let search_config = config.search_params();
    let params = SearchParams::parse(query);
    let sync = TableStateSync::new(&path, &search_config, params.without(DIALOG_PARAMS));
    let crud = CrudService::<R>::new(state.api(), Some(&auth.token));
    let mut toasts = toast::take(auth.session.storage()).await;

    let model = match crud.list(sync.state()).await {
        Ok(model) => model,
        Err(e) if e.is_auth() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load rows");
            toasts.push(Toast::error(format!(
                "Could not load {}. Please try again.",
                R::TITLE.to_lowercase()
            )));
            TableModel::build(R::MODE, Vec::new(), None, sync.state(), R::SEARCHABLE)
        }
    };

    let row_ids = model.row_ids();
    let selection = RowSelection::restore(
        model.data_key(),
        params.get("data_key"),
        params.get_all("selected").map(String::from),
        &row_ids,
    );

    let kind = submission
        .as_ref()
        .map(|s| s.kind)
        .or_else(|| params.get("dialog").and_then(|d| d.parse().ok()));
    let id = submission.as_ref().and_then(|s| s.id).or_else(|| params.get("id"));
    let row = match (kind, id) {
        (Some(kind), Some(id)) if kind.needs_row() => find_row(&crud, model.rows(), id).await?,
        _ => None,
    };
    let selected = model
        .rows()
        .iter()
        .filter(|r| selection.is_selected(&r.row_id()))
        .cloned()
        .collect();
    let dialog = DialogState::resolve(kind, row, selected);

    match kind {
        Some(DialogKind::Update | DialogKind::Delete) if !dialog.is_open() => {
            toasts.push(Toast::error(format!("That {} no longer exists.", R::SINGULAR)));
        }
        Some(DialogKind::BulkDelete) if !dialog.is_open() => {
            toasts.push(Toast::info(format!("Select at least one {}.", R::SINGULAR)));
        }
        _ => {}
    }

    let return_to = sync.params().href(&path);
    let (values, errors) = match submission {
        Some(s) => (Some(s.values), s.errors),
        None => (None, FieldErrors::new()),
    };

    let template = ResourceIndexTemplate {
        layout: LayoutView::new(Some(&auth.user), &path, toasts),
        title: R::TITLE,
        singular: R::SINGULAR,
        table: DataTableView::build(&config, &sync, &model, &selection),
        dialog: DialogView::build(&dialog, &return_to, values.as_ref(), &errors),
    };
    Ok((status, Html(template.render()?)).into_response())
}

/// Show a rejected form again, on the table page it was opened from.
async fn rerender<R: Resource>(
    state: &AppState,
    auth: &RequireAuth,
    return_to: &str,
    submission: Submission<'_>,
) -> Result<Response, AppError> {
    let query = return_to.split_once('?').map_or("", |(_, query)| query);
    render_index::<R>(state, auth, query, Some(submission), StatusCode::UNPROCESSABLE_ENTITY).await
}

/// Map a failed create or update onto the form.
///
/// Backend validation errors are shown inline, authentication failures end
/// the session, anything else keeps the dialog open with a toast.
async fn mutation_failed<R: Resource>(
    state: &AppState,
    auth: &RequireAuth,
    return_to: &str,
    mut submission: Submission<'_>,
    error: ApiError,
) -> Result<Response, AppError> {
    match error {
        ApiError::Validation { message, fields } => {
            let mut errors = FieldErrors::from_backend(fields, &R::field_names());
            if errors.is_empty() {
                errors.add(GENERAL, message);
            }
            submission.errors = errors;
            rerender::<R>(state, auth, return_to, submission).await
        }
        e if e.is_auth() => Err(e.into()),
        e => {
            tracing::error!(error = %e, "Mutation failed");
            let action = if submission.kind == DialogKind::Create { "create" } else { "update" };
            toast::push(
                auth.session.storage(),
                Toast::error(failure_message::<R>(&e, action)),
            )
            .await?;
            let query = return_to.split_once('?').map_or("", |(_, query)| query);
            render_index::<R>(state, auth, query, Some(submission), StatusCode::BAD_GATEWAY).await
        }
    }
}

/// The row acted on by a dialog: from the current page when it is there,
/// otherwise fetched by ID.
async fn find_row<R: Resource>(
    crud: &CrudService<'_, R>,
    rows: &[R],
    id: &str,
) -> Result<Option<R>, AppError> {
    if let Some(row) = rows.iter().find(|r| r.row_id() == id) {
        return Ok(Some(row.clone()));
    }
    match crud.get(id).await {
        Ok(row) => Ok(row),
        Err(e) if e.is_auth() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, id, "Failed to load dialog row");
            Ok(None)
        }
    }
}

/// Where a mutation returns to: the submitted table location when it belongs
/// to this resource, otherwise the resource index.
fn return_location<R: Resource>(submitted: Option<&str>) -> String {
    let path = R::path();
    submitted
        .and_then(guard::sanitize_redirect)
        .filter(|target| {
            *target == path
                || target
                    .strip_prefix(path.as_str())
                    .is_some_and(|rest| rest.starts_with('?'))
        })
        .map_or(path.clone(), ToString::to_string)
}

fn failure_message<R: Resource>(error: &ApiError, action: &str) -> String {
    match error {
        ApiError::GraphQL(messages) if !messages.is_empty() => messages.join(" "),
        _ => format!("Could not {action} {}. Please try again.", R::SINGULAR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Branch, FleetType};

    #[test]
    fn test_return_location_keeps_table_state() {
        assert_eq!(
            return_location::<Branch>(Some("/branches?page=3&search=rot")),
            "/branches?page=3&search=rot"
        );
        assert_eq!(return_location::<Branch>(Some("/branches")), "/branches");
    }

    #[test]
    fn test_return_location_rejects_foreign_targets() {
        for target in [
            "https://evil.example/branches",
            "//evil.example",
            "/positions?page=2",
            "/branches-archive",
            "/branches/7",
        ] {
            assert_eq!(return_location::<Branch>(Some(target)), "/branches", "{target}");
        }
        assert_eq!(return_location::<FleetType>(None), "/fleet-types");
    }

    #[test]
    fn test_failure_message_prefers_backend_text() {
        let error = ApiError::GraphQL(vec!["Branch is referenced by 3 vehicles.".to_string()]);
        assert_eq!(
            failure_message::<Branch>(&error, "delete"),
            "Branch is referenced by 3 vehicles."
        );
        assert_eq!(
            failure_message::<Branch>(&ApiError::Status(500), "delete"),
            "Could not delete branch. Please try again."
        );
    }
}
