//! GraphQL documents.
//!
//! Every resource exposes the same six operations. Root fields are aliased to
//! fixed names (`items`, `item`, `created`, `updated`, `deleted`) so one set of
//! response types decodes every resource.

use graphql_client::QueryBody;
use serde::{Deserialize, Serialize};

/// The six documents of one resource.
#[derive(Debug, Clone, Copy)]
pub struct CrudDocuments {
    pub list: &'static str,
    pub get: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub bulk_delete: &'static str,
}

/// Operation names shared by every resource.
pub mod operation {
    pub const LIST: &str = "List";
    pub const GET: &str = "Get";
    pub const CREATE: &str = "Create";
    pub const UPDATE: &str = "Update";
    pub const DELETE: &str = "Delete";
    pub const BULK_DELETE: &str = "BulkDelete";
    pub const LOGIN: &str = "Login";
    pub const LOGOUT: &str = "Logout";
    pub const ME: &str = "Me";
    pub const PING: &str = "Ping";
}

/// Build [`CrudDocuments`] from root field names and a selection set.
///
/// `paginated` resources take `first`/`page`/`search`/`orderBy` plus any
/// extra filter arguments and return a paginator. `all` resources return
/// every row and are paginated in memory.
#[macro_export]
macro_rules! crud_documents {
    (
        paginated {
            list: $list:literal,
            single: $single:literal,
            create: $create:literal,
            update: $update:literal,
            delete: $delete:literal,
            bulk_delete: $bulk_delete:literal,
            input: $input:literal,
            filter_variables: $filter_vars:literal,
            filter_arguments: $filter_args:literal,
            fields: $fields:literal $(,)?
        }
    ) => {
        $crate::graphql::documents::CrudDocuments {
            list: concat!(
                "query List($first: Int!, $page: Int, $search: String, $orderBy: [OrderByClause!]",
                $filter_vars,
                ") { items: ",
                $list,
                "(first: $first, page: $page, search: $search, orderBy: $orderBy",
                $filter_args,
                ") { data { ",
                $fields,
                " } paginatorInfo { count currentPage hasMorePages lastItem perPage total } } }"
            ),
            ..$crate::crud_documents!(@common $single, $create, $update, $delete, $bulk_delete, $input, $fields)
        }
    };
    (
        all {
            list: $list:literal,
            single: $single:literal,
            create: $create:literal,
            update: $update:literal,
            delete: $delete:literal,
            bulk_delete: $bulk_delete:literal,
            input: $input:literal,
            fields: $fields:literal $(,)?
        }
    ) => {
        $crate::graphql::documents::CrudDocuments {
            list: concat!("query List { items: ", $list, " { ", $fields, " } }"),
            ..$crate::crud_documents!(@common $single, $create, $update, $delete, $bulk_delete, $input, $fields)
        }
    };
    (@common $single:literal, $create:literal, $update:literal, $delete:literal, $bulk_delete:literal, $input:literal, $fields:literal) => {
        $crate::graphql::documents::CrudDocuments {
            list: "",
            get: concat!("query Get($id: ID!) { item: ", $single, "(id: $id) { ", $fields, " } }"),
            create: concat!(
                "mutation Create($input: ", $input, "!) { created: ", $create,
                "(input: $input) { ", $fields, " } }"
            ),
            update: concat!(
                "mutation Update($id: ID!, $input: ", $input, "!) { updated: ", $update,
                "(id: $id, input: $input) { ", $fields, " } }"
            ),
            delete: concat!("mutation Delete($id: ID!) { deleted: ", $delete, "(id: $id) { id } }"),
            bulk_delete: concat!(
                "mutation BulkDelete($ids: [ID!]!) { deleted: ", $bulk_delete, "(ids: $ids) { id } }"
            ),
        }
    };
}

/// `login(input)` mutation returning the token and user.
pub const LOGIN: &str = "mutation Login($input: LoginInput!) { login(input: $input) { accessToken user { id name email roles { id name } permissions { id name } } } }";

/// `logout` mutation; revokes the bearer token server-side.
pub const LOGOUT: &str = "mutation Logout { logout { status } }";

/// The authenticated user.
pub const ME: &str = "query Me { me { id name email roles { id name } permissions { id name } } }";

/// Cheapest query the backend answers; used for readiness.
pub const PING: &str = "query Ping { __typename }";

/// Variables for [`LOGIN`].
#[derive(Debug, Serialize)]
pub struct LoginVariables<'a> {
    pub input: LoginInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct LoginInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub login: LoginPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub access_token: String,
    pub user: freightdesk_core::User,
}

#[derive(Debug, Deserialize)]
pub struct MeData {
    pub me: Option<freightdesk_core::User>,
}

#[derive(Debug, Deserialize)]
pub struct LogoutData {
    pub logout: Option<serde_json::Value>,
}

/// Variables for documents without any.
#[derive(Debug, Serialize)]
pub struct NoVariables {}

/// `orderBy` clause in the backend's ordering format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderByClause {
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl OrderByClause {
    /// `exchange_rate` descending becomes `{column: "EXCHANGE_RATE", order: DESC}`.
    #[must_use]
    pub fn new(column: &str, desc: bool) -> Self {
        Self {
            column: column.to_ascii_uppercase(),
            order: if desc { SortOrder::Desc } else { SortOrder::Asc },
        }
    }
}

/// Response of every `List` document.
#[derive(Debug, Deserialize)]
pub struct ListData<T> {
    pub items: T,
}

#[derive(Debug, Deserialize)]
pub struct GetData<T> {
    pub item: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct CreateData<T> {
    pub created: T,
}

#[derive(Debug, Deserialize)]
pub struct UpdateData<T> {
    pub updated: T,
}

/// Response of `Delete` (one row) and `BulkDelete` (a list).
#[derive(Debug, Deserialize)]
pub struct DeleteData<T> {
    pub deleted: T,
}

/// Identifier echoed back by delete mutations.
#[derive(Debug, Deserialize)]
pub struct Deleted {
    pub id: String,
}

/// Wrap variables into a request body.
pub const fn body<V>(query: &'static str, operation_name: &'static str, variables: V) -> QueryBody<V> {
    QueryBody {
        variables,
        query,
        operation_name,
    }
}

/// Body for [`ME`].
#[must_use]
pub const fn me() -> QueryBody<NoVariables> {
    body(ME, operation::ME, NoVariables {})
}
