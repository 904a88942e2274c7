//! Report route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::api::{Order, Product, User};
use crate::components::TableColumn;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::report::{ReportSummary, render_admin_report};
use crate::state::AppState;

/// Report view template: overview plus the three tables.
#[derive(Template, WebTemplate)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub summary: ReportSummary,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub users: Vec<User>,
    pub product_columns: Vec<TableColumn>,
    pub order_columns: Vec<TableColumn>,
    pub user_columns: Vec<TableColumn>,
}

/// Display the aggregated report.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = state.api().products(&admin.token).await?;
    let orders = state.api().orders(&admin.token).await?;
    let users = state.api().users(&admin.token).await?;

    let summary = ReportSummary::aggregate(&products, &orders, &users);

    Ok(ReportTemplate {
        summary,
        products,
        orders,
        users,
        product_columns: vec![
            TableColumn::new("name", "Product Name"),
            TableColumn::new("stock", "Stock"),
            TableColumn::new("price", "Price"),
        ],
        order_columns: vec![
            TableColumn::new("id", "Order ID"),
            TableColumn::new("total", "Total Price"),
            TableColumn::new("status", "Status"),
        ],
        user_columns: vec![
            TableColumn::new("id", "User ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("email", "Email"),
        ],
    })
}

/// Download the report as `admin-report.pdf`.
#[instrument(skip(state, admin))]
pub async fn download_pdf(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response> {
    let products = state.api().products(&admin.token).await?;
    let orders = state.api().orders(&admin.token).await?;
    let users = state.api().users(&admin.token).await?;

    let summary = ReportSummary::aggregate(&products, &orders, &users);
    let bytes = render_admin_report(&products, &orders, &users, &summary)
        .map_err(|e| AppError::Internal(format!("admin report render failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"admin-report.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
