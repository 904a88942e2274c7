//! Review moderation route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use meridian_core::{ProductId, ReviewId};

use crate::api::Review;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Query parameters: which product to list reviews for.
#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub product_id: Option<i64>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Delete form data: carries the product id for the redirect back.
#[derive(Debug, Deserialize)]
pub struct DeleteReviewForm {
    pub product_id: i64,
}

/// Review list template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsIndexTemplate {
    pub product_id: Option<i64>,
    pub reviews: Vec<Review>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display reviews for a product (or the lookup form when none is chosen).
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ReviewsQuery>,
) -> Result<impl IntoResponse> {
    let reviews = match query.product_id {
        Some(id) => {
            state
                .api()
                .reviews(&admin.token, ProductId::new(id))
                .await?
        }
        None => Vec::new(),
    };

    Ok(ReviewsIndexTemplate {
        product_id: query.product_id,
        reviews,
        error: query.error,
        success: query.success,
    })
}

/// Delete a review.
#[instrument(skip(state, admin, form))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<DeleteReviewForm>,
) -> Result<Response> {
    state
        .api()
        .delete_review(&admin.token, ReviewId::new(id))
        .await?;

    Ok(Redirect::to(&format!(
        "/reviews?product_id={}&success=deleted",
        form.product_id
    ))
    .into_response())
}
