//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use meridian_core::ProductId;

use crate::api::{ApiError, Product};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
    pub in_stock: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);
    let product = state.api().product(id).await.map_err(|e| match e {
        ApiError::NotFound(_) => AppError::NotFound(format!("product {id}")),
        other => AppError::Api(other),
    })?;

    Ok(ProductShowTemplate {
        in_stock: product.stock > 0,
        product: (*product).clone(),
        error: query.error,
        success: query.success,
    })
}
