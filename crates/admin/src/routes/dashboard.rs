//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::report::ReportSummary;
use crate::state::AppState;

/// Dashboard template: the aggregate overview plus entity shortcuts.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub summary: ReportSummary,
}

/// Display the dashboard.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = state.api().products(&admin.token).await?;
    let orders = state.api().orders(&admin.token).await?;
    let users = state.api().users(&admin.token).await?;

    let summary = ReportSummary::aggregate(&products, &orders, &users);

    Ok(DashboardTemplate {
        admin_name: admin.name,
        summary,
    })
}
