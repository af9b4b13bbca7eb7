//! End-to-end harness for the FreightDesk admin panel.
//!
//! Each test spawns two servers on ephemeral ports: an in-memory GraphQL
//! backend that answers the panel's documents, and the panel itself built
//! with [`freightdesk_admin::app`]. Tests drive the panel over HTTP with a
//! cookie-keeping client that does not follow redirects, so every guard
//! decision can be asserted on its `Location` header.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p freightdesk-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    routing::post,
};
use freightdesk_admin::config::{AdminConfig, ApiConfig};
use freightdesk_admin::state::AppState;
use reqwest::redirect::Policy;
use serde_json::{Map, Value, json};

/// Email accepted by the mock backend.
pub const EMAIL: &str = "dana@freightdesk.dev";
/// Password accepted by the mock backend.
pub const PASSWORD: &str = "correct horse";

/// GraphQL root fields of one resource.
struct Collection {
    list: &'static str,
    single: &'static str,
    create: &'static str,
    update: &'static str,
    delete: &'static str,
    bulk_delete: &'static str,
}

const COLLECTIONS: &[Collection] = &[
    Collection {
        list: "branches",
        single: "branch",
        create: "createBranch",
        update: "updateBranch",
        delete: "deleteBranch",
        bulk_delete: "deleteBranches",
    },
    Collection {
        list: "currencies",
        single: "currency",
        create: "createCurrency",
        update: "updateCurrency",
        delete: "deleteCurrency",
        bulk_delete: "deleteCurrencies",
    },
    Collection {
        list: "fleetTypes",
        single: "fleetType",
        create: "createFleetType",
        update: "updateFleetType",
        delete: "deleteFleetType",
        bulk_delete: "deleteFleetTypes",
    },
    Collection {
        list: "positions",
        single: "position",
        create: "createPosition",
        update: "updatePosition",
        delete: "deletePosition",
        bulk_delete: "deletePositions",
    },
];

/// Everything the mock backend knows.
#[derive(Default)]
pub struct BackendState {
    tokens: HashSet<String>,
    issued: u32,
    next_id: u32,
    rows: std::collections::HashMap<&'static str, Vec<Value>>,
    /// `(operation, root field)` of every request, in order.
    pub calls: Vec<(String, String)>,
}

impl BackendState {
    fn rows_mut(&mut self, list: &'static str) -> &mut Vec<Value> {
        self.rows.entry(list).or_default()
    }
}

/// Handle on the mock GraphQL backend.
#[derive(Clone)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
    pub url: String,
}

impl MockBackend {
    /// Add `count` branches named `Branch 01`, `Branch 02`, ...
    pub fn seed_branches(&self, count: u32) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state.next_id += 1;
            let id = state.next_id;
            state.rows_mut("branches").push(json!({
                "id": id.to_string(),
                "name": format!("Branch {id:02}"),
                "code": format!("B{id:02}"),
                "address": null,
                "phone": null,
                "status": if id % 2 == 0 { "INACTIVE" } else { "ACTIVE" },
            }));
        }
    }

    /// IDs of the stored branches.
    pub fn branch_ids(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .rows
            .get("branches")
            .map(|rows| {
                rows.iter()
                    .filter_map(|r| r["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Invalidate every issued token, as if they all expired.
    pub fn revoke_all_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    /// How many list queries hit `list`.
    pub fn list_calls(&self, list: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(op, field)| op == "List" && field == list)
            .count()
    }

    /// Operations received so far.
    pub fn operations(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(op, _)| op.clone())
            .collect()
    }
}

/// A running panel wired to a [`MockBackend`].
pub struct TestApp {
    pub backend: MockBackend,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the backend and the panel.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(BackendState::default()));
        let backend_router = Router::new()
            .route("/graphql", post(graphql))
            .with_state(Arc::clone(&state));
        let backend_addr = serve(backend_router).await;
        let backend = MockBackend {
            state,
            url: format!("http://{backend_addr}/graphql"),
        };

        let config = AdminConfig::local(ApiConfig::parse(&backend.url).unwrap());
        let admin_addr = serve(freightdesk_admin::app(AppState::new(config))).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            backend,
            base_url: format!("http://{admin_addr}"),
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client.post(self.url(path)).form(form).send().await.unwrap()
    }

    /// Sign in with the accepted credentials.
    pub async fn sign_in(&self) {
        let response = self
            .post_form("/sign-in", &[("email", EMAIL), ("password", PASSWORD)])
            .await;
        assert!(
            response.status().is_redirection(),
            "sign-in failed with {}",
            response.status()
        );
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn user() -> Value {
    json!({
        "id": "u-1",
        "name": "Dana Ops",
        "email": EMAIL,
        "roles": [{ "id": "r-1", "name": "admin" }],
        "permissions": [{ "id": "p-1", "name": "manage branches" }],
    })
}

fn error(category: &str, message: &str) -> Value {
    json!({ "errors": [{ "message": message, "extensions": { "category": category } }] })
}

/// Alias target in `query`: `root_field(q, "items")` finds `items: branches`.
fn root_field<'a>(query: &'a str, alias: &str) -> Option<&'a str> {
    let start = query.find(&format!("{alias}: "))? + alias.len() + 2;
    let rest = query.get(start..)?;
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    rest.get(..end)
}

async fn graphql(
    State(state): State<Arc<Mutex<BackendState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let query = body["query"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let mut state = state.lock().unwrap();
    let alias = match operation.as_str() {
        "List" => "items",
        "Get" => "item",
        "Create" => "created",
        "Update" => "updated",
        "Delete" | "BulkDelete" => "deleted",
        _ => "",
    };
    let field = root_field(&query, alias).unwrap_or_default().to_string();
    state.calls.push((operation.clone(), field.clone()));

    match operation.as_str() {
        "Ping" => return Json(json!({ "data": { "__typename": "Query" } })),
        "Login" => {
            let input = &variables["input"];
            if input["email"] != EMAIL || input["password"] != PASSWORD {
                return Json(error("authentication", "Invalid credentials."));
            }
            state.issued += 1;
            let token = format!("token-{}", state.issued);
            state.tokens.insert(token.clone());
            return Json(json!({ "data": { "login": { "accessToken": token, "user": user() } } }));
        }
        _ => {}
    }

    if !token.is_some_and(|t| state.tokens.contains(&t)) {
        return Json(error("authentication", "Unauthenticated."));
    }

    let data = match operation.as_str() {
        "Me" => json!({ "me": user() }),
        "Logout" => {
            if let Some(t) = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
            {
                state.tokens.remove(t);
            }
            json!({ "logout": { "status": "TOKEN_REVOKED" } })
        }
        _ => {
            let Some(collection) = COLLECTIONS.iter().find(|c| {
                [c.list, c.single, c.create, c.update, c.delete, c.bulk_delete].contains(&field.as_str())
            }) else {
                return Json(error("internal", &format!("Unknown document: {query}")));
            };
            match collection_op(&mut state, collection, &operation, &query, &variables) {
                Ok(data) => data,
                Err(response) => return Json(response),
            }
        }
    };

    Json(json!({ "data": data }))
}

fn collection_op(
    state: &mut BackendState,
    collection: &Collection,
    operation: &str,
    query: &str,
    variables: &Value,
) -> Result<Value, Value> {
    match operation {
        "List" => {
            let rows = state.rows_mut(collection.list).clone();
            if !query.contains("$first") {
                return Ok(json!({ "items": rows }));
            }
            Ok(json!({ "items": paginate(rows, variables) }))
        }
        "Get" => {
            let id = &variables["id"];
            let row = state
                .rows_mut(collection.list)
                .iter()
                .find(|r| &r["id"] == id)
                .cloned();
            Ok(json!({ "item": row }))
        }
        "Create" | "Update" => {
            let input = variables["input"].as_object().cloned().unwrap_or_default();
            let id = variables["id"].as_str().map(str::to_string);
            let rows = state.rows_mut(collection.list);

            let code = input.get("code").cloned().unwrap_or(Value::Null);
            if !code.is_null() && rows.iter().any(|r| r["code"] == code && r["id"].as_str() != id.as_deref()) {
                return Err(json!({ "errors": [{
                    "message": "Validation failed for the field [createBranch].",
                    "extensions": {
                        "category": "validation",
                        "validation": { "input.code": ["The code has already been taken."] },
                    },
                }] }));
            }

            let row = if let Some(id) = id {
                let Some(row) = rows.iter_mut().find(|r| r["id"] == id.as_str()) else {
                    return Err(error("internal", "No query results for model."));
                };
                merge(row, &input);
                row.clone()
            } else {
                state.next_id += 1;
                let mut row = json!({ "id": state.next_id.to_string() });
                merge(&mut row, &input);
                state.rows_mut(collection.list).push(row.clone());
                row
            };
            let key = if operation == "Create" { "created" } else { "updated" };
            let mut data = Map::new();
            data.insert(key.to_string(), row);
            Ok(Value::Object(data))
        }
        "Delete" => {
            let id = variables["id"].clone();
            let rows = state.rows_mut(collection.list);
            let before = rows.len();
            rows.retain(|r| r["id"] != id);
            let deleted = (rows.len() < before).then(|| json!({ "id": id }));
            Ok(json!({ "deleted": deleted }))
        }
        "BulkDelete" => {
            let ids: Vec<Value> = variables["ids"].as_array().cloned().unwrap_or_default();
            let rows = state.rows_mut(collection.list);
            let deleted: Vec<Value> = rows
                .iter()
                .filter(|r| ids.contains(&r["id"]))
                .map(|r| json!({ "id": r["id"] }))
                .collect();
            rows.retain(|r| !ids.contains(&r["id"]));
            Ok(json!({ "deleted": deleted }))
        }
        other => Err(error("internal", &format!("Unsupported operation {other}"))),
    }
}

fn merge(row: &mut Value, input: &Map<String, Value>) {
    if let Some(object) = row.as_object_mut() {
        for (key, value) in input {
            object.insert(key.clone(), value.clone());
        }
    }
}

/// Apply `search`, column filters and paging the way the backend would.
fn paginate(rows: Vec<Value>, variables: &Value) -> Value {
    let search = variables["search"].as_str().unwrap_or_default().to_lowercase();
    let statuses: Vec<Value> = variables["status"].as_array().cloned().unwrap_or_default();
    let mut rows: Vec<Value> = rows
        .into_iter()
        .filter(|r| {
            search.is_empty()
                || ["name", "code"].iter().any(|k| {
                    r[*k].as_str().is_some_and(|v| v.to_lowercase().contains(&search))
                })
        })
        .filter(|r| statuses.is_empty() || statuses.contains(&r["status"]))
        .collect();

    if let Some(clause) = variables["orderBy"].as_array().and_then(|c| c.first()) {
        let column = clause["column"].as_str().unwrap_or_default().to_lowercase();
        rows.sort_by(|a, b| {
            a[&column]
                .as_str()
                .unwrap_or_default()
                .cmp(b[&column].as_str().unwrap_or_default())
        });
        if clause["order"] == "DESC" {
            rows.reverse();
        }
    }

    let per_page = variables["first"].as_u64().unwrap_or(10).max(1) as usize;
    let page = variables["page"].as_u64().unwrap_or(1).max(1) as usize;
    let total = rows.len();
    let data: Vec<Value> = rows.into_iter().skip((page - 1) * per_page).take(per_page).collect();
    let first = (page - 1) * per_page;

    json!({
        "data": data,
        "paginatorInfo": {
            "count": data.len(),
            "currentPage": page,
            "hasMorePages": first + data.len() < total,
            "lastItem": if data.is_empty() { Value::Null } else { json!(first + data.len()) },
            "perPage": per_page,
            "total": total,
        },
    })
}
