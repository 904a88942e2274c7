//! Keyword search route handler.
//!
//! Search itself is a backend concern; this handler forwards the keyword and
//! renders the matching catalog page.

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

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<u32>,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub keyword: String,
    pub encoded_keyword: String,
    pub products: Vec<Product>,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_more_pages: bool,
}

/// Display search results for a keyword.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let keyword = query.keyword.unwrap_or_default();
    let current_page = query.page.unwrap_or(1).max(1);

    let page = if keyword.trim().is_empty() {
        state.api().products(None, current_page).await?
    } else {
        state.api().products(Some(&keyword), current_page).await?
    };

    let total_pages = page.total_pages();
    let encoded_keyword = urlencoding::encode(&keyword).into_owned();

    Ok(SearchTemplate {
        keyword,
        encoded_keyword,
        products: page.products.clone(),
        current_page,
        total_pages,
        has_more_pages: u64::from(current_page) < total_pages,
    })
}
