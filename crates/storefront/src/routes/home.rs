//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::Product;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Home page template: the first catalog page plus a search box.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<Product>,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_more_pages: bool,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let current_page = query.page.unwrap_or(1).max(1);
    let page = state.api().products(None, current_page).await?;

    let total_pages = page.total_pages();

    Ok(HomeTemplate {
        products: page.products.clone(),
        current_page,
        total_pages,
        has_more_pages: u64::from(current_page) < total_pages,
    })
}
