//! Generic CRUD service over a [`Resource`].

use std::marker::PhantomData;

use freightdesk_core::pagination::Paginated;
use freightdesk_core::table::{ProcessingMode, TableModel, TableUrlState};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::graphql::documents::{
    self, CreateData, DeleteData, Deleted, GetData, ListData, NoVariables, OrderByClause,
    UpdateData, operation,
};
use crate::graphql::{ApiClient, ApiError};
use crate::resources::Resource;

/// Runs a resource's documents with the caller's bearer token.
pub struct CrudService<'a, R> {
    api: &'a ApiClient,
    token: Option<&'a str>,
    resource: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> CrudService<'a, R> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, token: Option<&'a str>) -> Self {
        Self {
            api,
            token,
            resource: PhantomData,
        }
    }

    /// Fetch the rows for the current table state.
    ///
    /// Manual resources fetch one page with search, sort and filters applied
    /// by the backend. Client resources fetch every row and process them in
    /// memory.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    #[instrument(skip(self, state), fields(resource = R::PLURAL, page = state.pagination.page()))]
    pub async fn list(&self, state: &TableUrlState) -> Result<TableModel<R>, ApiError> {
        match R::MODE {
            ProcessingMode::Manual => {
                let body = documents::body(R::DOCUMENTS.list, operation::LIST, list_variables::<R>(state));
                let data: ListData<Paginated<R>> = self.api.execute(&body, self.token).await?;
                Ok(TableModel::manual(data.items.data, &data.items.paginator_info))
            }
            ProcessingMode::Client => {
                let body = documents::body(R::DOCUMENTS.list, operation::LIST, NoVariables {});
                let data: ListData<Vec<R>> = self.api.execute(&body, self.token).await?;
                Ok(TableModel::client(data.items, state, R::SEARCHABLE))
            }
        }
    }

    /// Fetch one row. `None` when the backend knows no such ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    #[instrument(skip(self), fields(resource = R::PLURAL))]
    pub async fn get(&self, id: &str) -> Result<Option<R>, ApiError> {
        let body = documents::body(R::DOCUMENTS.get, operation::GET, json!({ "id": id }));
        let data: GetData<R> = self.api.execute(&body, self.token).await?;
        Ok(data.item)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the backend rejects the input.
    #[instrument(skip(self, input), fields(resource = R::PLURAL))]
    pub async fn create(&self, input: &R::Input) -> Result<R, ApiError> {
        let body = documents::body(
            R::DOCUMENTS.create,
            operation::CREATE,
            MutationVariables { id: None, input },
        );
        let data: CreateData<R> = self.api.execute(&body, self.token).await?;
        Ok(data.created)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the backend rejects the input.
    #[instrument(skip(self, input), fields(resource = R::PLURAL))]
    pub async fn update(&self, id: &str, input: &R::Input) -> Result<R, ApiError> {
        let body = documents::body(
            R::DOCUMENTS.update,
            operation::UPDATE,
            MutationVariables {
                id: Some(id),
                input,
            },
        );
        let data: UpdateData<R> = self.api.execute(&body, self.token).await?;
        Ok(data.updated)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    #[instrument(skip(self), fields(resource = R::PLURAL))]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let body = documents::body(R::DOCUMENTS.delete, operation::DELETE, json!({ "id": id }));
        let _: DeleteData<Option<Deleted>> = self.api.execute(&body, self.token).await?;
        Ok(())
    }

    /// Delete several rows in one mutation. Returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend call fails.
    #[instrument(skip(self, ids), fields(resource = R::PLURAL, count = ids.len()))]
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<usize, ApiError> {
        let body = documents::body(
            R::DOCUMENTS.bulk_delete,
            operation::BULK_DELETE,
            json!({ "ids": ids }),
        );
        let data: DeleteData<Vec<Deleted>> = self.api.execute(&body, self.token).await?;
        Ok(data.deleted.len())
    }
}

#[derive(Serialize)]
struct MutationVariables<'a, I> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    input: &'a I,
}

/// Variables of a paginated `List` document.
pub(crate) fn list_variables<R: Resource>(state: &TableUrlState) -> Value {
    let mut variables = serde_json::Map::new();
    variables.insert("first".to_string(), json!(state.pagination.page_size));
    variables.insert("page".to_string(), json!(state.pagination.page()));
    if !state.global_filter.is_empty() {
        variables.insert("search".to_string(), json!(state.global_filter));
    }
    if !state.sorting.is_empty() {
        let order_by: Vec<OrderByClause> = state
            .sorting
            .iter()
            .map(|s| OrderByClause::new(&s.id, s.desc))
            .collect();
        variables.insert("orderBy".to_string(), json!(order_by));
    }
    variables.extend(R::filter_variables(state));
    Value::Object(variables)
}

#[cfg(test)]
mod tests {
    use freightdesk_core::table::{ColumnFilter, Pagination, SortColumn};

    use super::*;
    use crate::resources::Branch;

    #[test]
    fn test_list_variables() {
        let state = TableUrlState {
            pagination: Pagination {
                page_index: 2,
                page_size: 20,
            },
            global_filter: "rot".to_string(),
            column_filters: vec![ColumnFilter::new("status", &["ACTIVE"])],
            sorting: vec![SortColumn::desc("name")],
        };
        assert_eq!(
            list_variables::<Branch>(&state),
            json!({
                "first": 20,
                "page": 3,
                "search": "rot",
                "orderBy": [{"column": "NAME", "order": "DESC"}],
                "status": ["ACTIVE"]
            })
        );
    }

    #[test]
    fn test_list_variables_omit_defaults() {
        let state = TableUrlState {
            pagination: Pagination {
                page_index: 0,
                page_size: 10,
            },
            global_filter: String::new(),
            column_filters: vec![],
            sorting: vec![],
        };
        assert_eq!(
            list_variables::<Branch>(&state),
            json!({ "first": 10, "page": 1 })
        );
    }
}
