//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use freightdesk_core::guard::SIGN_IN_PATH;
use freightdesk_core::table::{Pagination, TableUrlState};
use tracing::instrument;

use crate::components::layout::LayoutView;
use crate::error::AppError;
use crate::filters;
use crate::graphql::{ApiClient, ApiError};
use crate::middleware::RequireAuth;
use crate::resources::{Branch, Currency, FleetType, Position, Resource};
use crate::services::toast;
use crate::services::{AuthService, CrudService};
use crate::state::AppState;

/// One resource card.
#[derive(Debug, Clone)]
pub struct ResourceSummary {
    pub title: &'static str,
    pub href: String,
    pub create_href: String,
    /// `None` when the count could not be loaded.
    pub total: Option<u32>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    layout: LayoutView,
    greeting_name: String,
    summaries: Vec<ResourceSummary>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET /
#[instrument(skip_all, fields(user_id = %auth.user.id))]
async fn index(State(state): State<AppState>, auth: RequireAuth) -> Result<Response, AppError> {
    let Some(user) = AuthService::new(state.api(), &auth.session)
        .refresh_user()
        .await?
    else {
        tracing::info!(user_id = %auth.user.id, "User no longer known to the backend");
        return Ok(Redirect::to(SIGN_IN_PATH).into_response());
    };

    let api = state.api();
    let token = auth.token.as_str();
    let (branches, currencies, fleet_types, positions) = tokio::join!(
        summary::<Branch>(api, token),
        summary::<Currency>(api, token),
        summary::<FleetType>(api, token),
        summary::<Position>(api, token),
    );
    let summaries = vec![branches?, currencies?, fleet_types?, positions?];

    let template = DashboardTemplate {
        layout: LayoutView::new(Some(&user), "/", toast::take(auth.session.storage()).await),
        greeting_name: user.name.split_whitespace().next().unwrap_or(&user.name).to_string(),
        summaries,
    };
    Ok(Html(template.render()?).into_response())
}

/// Row count for one resource. Only authentication failures abort the page.
async fn summary<R: Resource>(api: &ApiClient, token: &str) -> Result<ResourceSummary, ApiError> {
    let state = TableUrlState {
        pagination: Pagination {
            page_index: 0,
            page_size: 1,
        },
        global_filter: String::new(),
        column_filters: Vec::new(),
        sorting: Vec::new(),
    };

    let total = match CrudService::<R>::new(api, Some(token)).list(&state).await {
        Ok(model) => Some(model.total()),
        Err(e) if e.is_auth() => return Err(e),
        Err(e) => {
            tracing::warn!(resource = R::PLURAL, error = %e, "Failed to count rows");
            None
        }
    };

    Ok(ResourceSummary {
        title: R::TITLE,
        href: R::path(),
        create_href: format!("{}?dialog=create", R::path()),
        total,
    })
}
