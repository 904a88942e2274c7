//! Order history route handlers.
//!
//! Orders are owned by the backend; these views are read-only, including the
//! lifecycle status the backend advances.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use meridian_core::OrderId;

use crate::api::{ApiError, Order};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<Order>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: Order,
}

/// Display the authenticated user's order history.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = state.api().my_orders(&user.token).await?;
    Ok(OrdersIndexTemplate { orders })
}

/// Display one order.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let id = OrderId::new(id);
    let order = state.api().order(&user.token, id).await.map_err(|e| match e {
        ApiError::NotFound(_) => AppError::NotFound(format!("order {id}")),
        other => AppError::Api(other),
    })?;

    Ok(OrderShowTemplate { order })
}
