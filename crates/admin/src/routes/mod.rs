//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /login                  - Login page (public)
//! POST /login                  - Login action (public; role checked)
//! POST /logout                 - Logout action
//!
//! GET  /                       - Redirect to dashboard
//! GET  /dashboard              - Catalog/order/user overview
//!
//! # Products
//! GET  /products               - Product list
//! GET  /products/new           - Create form
//! POST /products               - Create product
//! GET  /products/{id}/edit     - Edit form
//! POST /products/{id}          - Update product
//! POST /products/{id}/delete   - Delete product
//!
//! # Orders
//! GET  /orders                 - Order list
//! GET  /orders/{id}            - Order detail
//! POST /orders/{id}/status     - Request a lifecycle transition
//! POST /orders/{id}/delete     - Delete order
//!
//! # Users
//! GET  /users                  - User list
//! GET  /users/{id}/edit        - Edit form
//! POST /users/{id}             - Update user
//! POST /users/{id}/delete      - Delete user
//!
//! # Reviews
//! GET  /reviews?product_id=    - Reviews for a product
//! POST /reviews/{id}/delete    - Delete review
//!
//! # Report
//! GET  /report                 - Aggregated report view
//! GET  /report/pdf             - Download admin-report.pdf
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod report;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/delete", post(orders::delete))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}", post(users::update))
        .route("/{id}/edit", get(users::edit_form))
        .route("/{id}/delete", post(users::delete))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/{id}/delete", post(reviews::delete))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
        .nest("/reviews", review_routes())
        .route("/report", get(report::show))
        .route("/report/pdf", get(report::download_pdf))
}
