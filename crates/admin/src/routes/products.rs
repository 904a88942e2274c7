//! Product CRUD route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use meridian_core::{Money, ProductId};

use crate::api::{Product, ProductDraft};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product form data (create and update share it).
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u32,
    pub category: String,
    pub brand: String,
    /// One image URL per line.
    pub images: String,
}

impl ProductForm {
    /// Parse the form into a draft; `None` when the price is not a number.
    fn into_draft(self) -> Option<ProductDraft> {
        let price = self.price.trim().parse::<Decimal>().ok()?;
        let brand = {
            let trimmed = self.brand.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };
        let images = self
            .images
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        Some(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description,
            price: Money::new(price),
            stock: self.stock,
            images,
            category: self.category.trim().to_string(),
            brand,
        })
    }
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<Product>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Create form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct ProductNewTemplate {
    pub error: Option<String>,
}

/// Edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub product: Product,
    pub images_joined: String,
    pub error: Option<String>,
}

/// Display the product list.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let products = state.api().products(&admin.token).await?;

    Ok(ProductsIndexTemplate {
        products,
        error: query.error,
        success: query.success,
    })
}

/// Display the create form.
pub async fn new_form(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    ProductNewTemplate { error: query.error }
}

/// Create a product.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let Some(draft) = form.into_draft() else {
        return Ok(Redirect::to("/products/new?error=invalid_price").into_response());
    };

    match state.api().create_product(&admin.token, &draft).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            Ok(Redirect::to("/products?success=created").into_response())
        }
        Err(e) => {
            tracing::warn!("Product creation failed: {e}");
            Ok(Redirect::to("/products/new?error=create_failed").into_response())
        }
    }
}

/// Display the edit form.
#[instrument(skip(state, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let product = state.api().product(&admin.token, ProductId::new(id)).await?;

    Ok(ProductEditTemplate {
        images_joined: product.images.join("\n"),
        product,
        error: query.error,
    })
}

/// Update a product.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let Some(draft) = form.into_draft() else {
        return Ok(Redirect::to(&format!("/products/{id}/edit?error=invalid_price")).into_response());
    };

    match state.api().update_product(&admin.token, id, &draft).await {
        Ok(_) => Ok(Redirect::to("/products?success=updated").into_response()),
        Err(e) => {
            tracing::warn!("Product update failed: {e}");
            Ok(Redirect::to(&format!("/products/{id}/edit?error=update_failed")).into_response())
        }
    }
}

/// Delete a product.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_product(&admin.token, ProductId::new(id))
        .await?;

    Ok(Redirect::to("/products?success=deleted").into_response())
}
