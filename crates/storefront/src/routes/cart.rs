//! Cart route handlers.
//!
//! The cart is a session-held slice; handlers load it, apply one pure
//! operation, and write it back. Price and stock are snapshotted from the
//! catalog at add time.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::{Money, ProductId};

use crate::error::Result;
use crate::filters;
use crate::models::{Cart, CartItem, session_keys};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, defaulting to empty.
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: Cart,
    pub subtotal: Money,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session, Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let cart = get_cart(&session).await;

    CartShowTemplate {
        subtotal: cart.subtotal(),
        cart,
        error: query.error,
        success: query.success,
    }
}

/// Add an item to the cart.
///
/// Fetches the product to snapshot price and stock, merges the line by
/// product id, then bounces back to the product page.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let product = state.api().product(product_id).await?;

    if product.stock == 0 {
        return Ok(
            Redirect::to(&format!("/products/{product_id}?error=out_of_stock")).into_response(),
        );
    }

    let mut cart = get_cart(&session).await;
    cart.add(CartItem {
        product_id,
        name: product.name.clone(),
        price: product.price,
        quantity: form.quantity.unwrap_or(1),
        image: product.primary_image().map(String::from),
        stock: product.stock,
    });
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart?success=added").into_response())
}

/// Update a line's quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart = get_cart(&session).await;
    cart.update_quantity(ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart = get_cart(&session).await;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart").into_response())
}
