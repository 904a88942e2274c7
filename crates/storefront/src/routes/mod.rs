//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (first catalog page)
//! GET  /health                  - Health check
//! GET  /search                  - Keyword search
//!
//! # Products
//! GET  /products/{id}           - Product detail
//!
//! # Cart (requires auth; see the capability table)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add item (merges by product id)
//! POST /cart/update             - Update line quantity
//! POST /cart/remove             - Remove line
//!
//! # Checkout (requires auth; see the capability table)
//! GET  /checkout/shipping       - Shipping form
//! POST /checkout/shipping       - Save shipping info
//! GET  /checkout/confirm        - Order summary (redirects to shipping if absent)
//! POST /checkout/confirm        - Fix pricing, continue to payment
//! GET  /checkout/confirm/report - Download order_report.pdf
//! GET  /checkout/payment        - Card capture (creates the payment intent)
//! POST /checkout/payment/complete - Processor confirmation outcome
//! GET  /checkout/success        - Terminal success view
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Account & orders (requires auth)
//! GET  /account                 - Profile
//! GET  /account/edit            - Profile form
//! POST /account                 - Update profile
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Order detail
//!
//! # Static pages
//! GET  /pages/about             - About page
//! GET  /pages/contact           - Contact page
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod pages;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shipping",
            get(checkout::shipping_page).post(checkout::save_shipping),
        )
        .route(
            "/confirm",
            get(checkout::confirm_page).post(checkout::confirm),
        )
        .route("/confirm/report", get(checkout::order_report))
        .route("/payment", get(checkout::payment_page))
        .route("/payment/complete", post(checkout::payment_complete))
        .route("/success", get(checkout::success_page))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).post(account::update_profile))
        .route("/edit", get(account::edit_profile))
}

/// Create the order-history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Search
        .route("/search", get(search::search))
        // Product detail
        .route("/products/{id}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout workflow
        .nest("/checkout", checkout_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Account routes
        .nest("/account", account_routes())
        // Order history
        .nest("/orders", order_routes())
        // Static pages
        .route("/pages/about", get(pages::about))
        .route("/pages/contact", get(pages::contact))
}
