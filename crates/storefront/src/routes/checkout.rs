//! Checkout workflow route handlers.
//!
//! Shipping -> Confirm -> Payment -> Success. Every step derives its gate
//! from the session's [`CheckoutSession`] stage and redirects backwards when
//! a prerequisite is missing; nothing past this module ever sees a partially
//! assembled checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use qrcode::QrCode;
use qrcode::render::svg;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meridian_core::PaymentStatus;

use crate::api::{OrderDraft, OrderItem, PaymentAddress, PaymentIntentRequest, PaymentShipping, PaymentResult};
use crate::checkout::{
    CheckoutError, CheckoutSession, CheckoutStage, OrderQuote, ShippingInfo, report,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Cart, session_keys};
use crate::routes::cart::{get_cart, save_cart};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the in-flight checkout from the session, starting one if absent.
pub async fn get_checkout(session: &Session) -> CheckoutSession {
    session
        .get::<CheckoutSession>(session_keys::CHECKOUT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the checkout back to the session.
pub async fn save_checkout(
    session: &Session,
    checkout: &CheckoutSession,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, checkout).await
}

/// Drop the checkout (order completed).
pub async fn clear_checkout(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutSession>(session_keys::CHECKOUT)
        .await?;
    Ok(())
}

// =============================================================================
// Form & Query Types
// =============================================================================

/// Shipping form data.
#[derive(Debug, Deserialize)]
pub struct ShippingForm {
    pub address: String,
    pub city: String,
    pub phone: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

impl From<ShippingForm> for ShippingInfo {
    fn from(form: ShippingForm) -> Self {
        Self {
            address: form.address,
            city: form.city,
            phone: form.phone,
            postal_code: form.postal_code,
            state: form.state,
            country: form.country,
        }
    }
}

/// Confirmation outcome posted back from the card-capture view.
#[derive(Debug, Deserialize)]
pub struct PaymentCompleteForm {
    pub intent_id: String,
    pub status: String,
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

/// Shipping form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/shipping.html")]
pub struct ShippingTemplate {
    pub shipping: Option<ShippingInfo>,
    pub error: Option<String>,
}

/// Order summary template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirm.html")]
pub struct ConfirmTemplate {
    pub customer_name: String,
    pub shipping: ShippingInfo,
    pub cart: Cart,
    pub quote: OrderQuote,
}

/// Card capture template.
///
/// Card fields are delegated entirely to the processor SDK; this view only
/// carries the client secret and the publishable key the SDK needs.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub quote: OrderQuote,
    pub client_secret: String,
    pub publishable_key: String,
    pub qr_svg: String,
    pub error: Option<String>,
}

/// Terminal success template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub success: Option<String>,
}

// =============================================================================
// Shipping Step
// =============================================================================

/// Display the shipping form, prefilled from any saved shipping info.
#[instrument(skip(session))]
pub async fn shipping_page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let checkout = get_checkout(&session).await;

    ShippingTemplate {
        shipping: checkout.shipping().cloned(),
        error: query.error,
    }
}

/// Save shipping info and advance to confirmation.
#[instrument(skip(session, form))]
pub async fn save_shipping(session: Session, Form(form): Form<ShippingForm>) -> Result<Response> {
    let mut checkout = get_checkout(&session).await;

    match checkout.enter_shipping(form.into()) {
        Ok(()) => {
            save_checkout(&session, &checkout).await?;
            Ok(Redirect::to("/checkout/confirm").into_response())
        }
        Err(CheckoutError::IncompleteShipping) => {
            Ok(Redirect::to("/checkout/shipping?error=incomplete").into_response())
        }
    }
}

// =============================================================================
// Confirm Step
// =============================================================================

/// Re-validate every cart line's stock against the live catalog.
///
/// The price snapshot is honored; only availability is re-checked. Returns
/// the redirect to send the visitor to when a line no longer fits.
async fn validate_stock(state: &AppState, cart: &Cart) -> Result<Option<Response>> {
    for line in &cart.items {
        let product = state.api().product_uncached(line.product_id).await?;
        if line.quantity > product.stock {
            tracing::warn!(
                product_id = %line.product_id,
                wanted = line.quantity,
                available = product.stock,
                "cart line exceeds current stock"
            );
            return Ok(Some(
                Redirect::to("/cart?error=stock_changed").into_response(),
            ));
        }
    }
    Ok(None)
}

/// Gate shared by the confirm step: shipping present, cart non-empty.
async fn confirm_gate(session: &Session) -> std::result::Result<(CheckoutSession, Cart), Response> {
    let checkout = get_checkout(session).await;
    if checkout.shipping().is_none() {
        // Missing shipping is a recoverable navigation error.
        return Err(Redirect::to("/checkout/shipping").into_response());
    }

    let cart = get_cart(session).await;
    if cart.is_empty() {
        return Err(Redirect::to("/cart?error=empty").into_response());
    }

    Ok((checkout, cart))
}

/// Display the order summary with the derived pricing.
#[instrument(skip(state, session, user))]
pub async fn confirm_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let (checkout, cart) = match confirm_gate(&session).await {
        Ok(pair) => pair,
        Err(redirect) => return Ok(redirect),
    };

    if let Some(redirect) = validate_stock(&state, &cart).await? {
        return Ok(redirect);
    }

    let quote = OrderQuote::for_subtotal(cart.subtotal());
    let shipping = checkout
        .shipping()
        .cloned()
        .ok_or_else(|| AppError::Internal("shipping vanished after gate".to_string()))?;

    Ok(ConfirmTemplate {
        customer_name: user.name,
        shipping,
        cart,
        quote,
    }
    .into_response())
}

/// Fix the pricing into the checkout session and continue to payment.
#[instrument(skip(state, session))]
pub async fn confirm(State(state): State<AppState>, session: Session) -> Result<Response> {
    let (mut checkout, cart) = match confirm_gate(&session).await {
        Ok(pair) => pair,
        Err(redirect) => return Ok(redirect),
    };

    if let Some(redirect) = validate_stock(&state, &cart).await? {
        return Ok(redirect);
    }

    let quote = OrderQuote::for_subtotal(cart.subtotal());
    checkout
        .confirm(quote)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    save_checkout(&session, &checkout).await?;

    Ok(Redirect::to("/checkout/payment").into_response())
}

/// Download the pending order as `order_report.pdf`.
#[instrument(skip(session, user))]
pub async fn order_report(session: Session, RequireAuth(user): RequireAuth) -> Result<Response> {
    let (checkout, cart) = match confirm_gate(&session).await {
        Ok(pair) => pair,
        Err(redirect) => return Ok(redirect),
    };

    let shipping = checkout
        .shipping()
        .ok_or_else(|| AppError::Internal("shipping vanished after gate".to_string()))?;
    let quote = OrderQuote::for_subtotal(cart.subtotal());

    let bytes = report::render_order_report(&user.name, shipping, &cart.items, &quote)
        .map_err(|e| AppError::Internal(format!("order report render failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"order_report.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

// =============================================================================
// Payment Step
// =============================================================================

/// Display the card-capture view, creating the payment intent server-side.
///
/// The intent request carries the checkout session's idempotency key, so
/// refreshing this page (or losing the response) reuses the same intent
/// instead of minting a second one.
#[instrument(skip(state, session, user))]
pub async fn payment_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let checkout = get_checkout(&session).await;

    let (shipping, quote) = match checkout.stage() {
        CheckoutStage::NoShipping => {
            return Ok(Redirect::to("/checkout/shipping").into_response());
        }
        CheckoutStage::ShippingEntered => {
            return Ok(Redirect::to("/checkout/confirm").into_response());
        }
        CheckoutStage::OrderConfirmed => {
            let shipping = checkout
                .shipping()
                .ok_or_else(|| AppError::Internal("confirmed checkout lost shipping".to_string()))?;
            let quote = checkout
                .quote()
                .ok_or_else(|| AppError::Internal("confirmed checkout lost quote".to_string()))?;
            (shipping.clone(), *quote)
        }
    };

    let amount = quote
        .total_minor_units()
        .ok_or_else(|| AppError::Internal("order total out of range".to_string()))?;

    let intent = state
        .api()
        .create_payment_intent(
            &user.token,
            &PaymentIntentRequest {
                amount,
                shipping: PaymentShipping {
                    name: user.name.clone(),
                    address: PaymentAddress {
                        line1: shipping.address.clone(),
                        city: shipping.city.clone(),
                        postal_code: shipping.postal_code.clone(),
                        state: shipping.state.clone(),
                        country: shipping.country.clone(),
                    },
                    phone: shipping.phone.clone(),
                },
                idempotency_key: checkout.idempotency_key(),
            },
        )
        .await?;

    let publishable_key = state.api().publishable_key().await?.publishable_key;
    let qr_svg = render_total_qr(&quote)?;

    Ok(PaymentTemplate {
        quote,
        client_secret: intent.client_secret,
        publishable_key,
        qr_svg,
        error: query.error,
    }
    .into_response())
}

/// Render the payable total as an SVG QR code.
fn render_total_qr(quote: &OrderQuote) -> Result<String> {
    let code = QrCode::new(quote.grand_total.to_string().as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encode failed: {e}")))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(160, 160)
        .build())
}

/// Absorb the processor confirmation outcome.
///
/// `succeeded` dispatches exactly one order creation, clears the cart and the
/// checkout session, and lands on the success view. Anything else surfaces a
/// flash and returns to the (re-enabled) payment form; nothing is persisted.
#[instrument(skip(state, session, user, form))]
pub async fn payment_complete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PaymentCompleteForm>,
) -> Result<Response> {
    let checkout = get_checkout(&session).await;
    let (Some(shipping), Some(quote)) = (checkout.shipping(), checkout.quote()) else {
        return Ok(Redirect::to("/checkout/confirm").into_response());
    };

    if form.status != "succeeded" {
        tracing::warn!(status = %form.status, "payment confirmation did not succeed");
        return Ok(Redirect::to("/checkout/payment?error=payment_failed").into_response());
    }

    let cart = get_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart?error=empty").into_response());
    }

    let draft = OrderDraft {
        items: cart.items.iter().map(OrderItem::from).collect(),
        shipping: shipping.clone(),
        amounts: *quote,
        payment: PaymentResult {
            id: form.intent_id,
            status: PaymentStatus::Succeeded,
        },
    };

    match state.api().create_order(&user.token, &draft).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, "order created");

            let mut cart = cart;
            cart.clear();
            save_cart(&session, &cart).await?;
            clear_checkout(&session).await?;

            Ok(Redirect::to("/checkout/success?success=payment").into_response())
        }
        Err(e) => {
            tracing::error!("order creation failed after successful payment: {e}");
            Ok(Redirect::to("/checkout/payment?error=order_failed").into_response())
        }
    }
}

// =============================================================================
// Success Step
// =============================================================================

/// Display the terminal success view.
#[instrument]
pub async fn success_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    SuccessTemplate {
        success: query.success,
    }
}
