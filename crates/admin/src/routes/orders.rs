//! Order management route handlers.
//!
//! The lifecycle itself is owned by the backend; status updates here are
//! requests the backend may refuse.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use meridian_core::{OrderId, OrderStatus};

use crate::api::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<Order>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: Order,
    pub statuses: Vec<OrderStatus>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the order list.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let orders = state.api().orders(&admin.token).await?;

    Ok(OrdersIndexTemplate {
        orders,
        error: query.error,
        success: query.success,
    })
}

/// Display one order with the status form.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let order = state.api().order(&admin.token, OrderId::new(id)).await?;

    Ok(OrderShowTemplate {
        order,
        statuses: OrderStatus::ALL.to_vec(),
        error: query.error,
        success: query.success,
    })
}

/// Request a lifecycle transition.
#[instrument(skip(state, admin, form))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let id = OrderId::new(id);
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(Redirect::to(&format!("/orders/{id}?error=invalid_status")).into_response());
    };

    match state.api().update_order_status(&admin.token, id, status).await {
        Ok(_) => Ok(Redirect::to(&format!("/orders/{id}?success=status_updated")).into_response()),
        Err(e) => {
            tracing::warn!("Order status update failed: {e}");
            Ok(Redirect::to(&format!("/orders/{id}?error=update_failed")).into_response())
        }
    }
}

/// Delete an order.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_order(&admin.token, OrderId::new(id))
        .await?;

    Ok(Redirect::to("/orders?success=deleted").into_response())
}
