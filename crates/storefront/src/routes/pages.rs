//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate;

/// Display the about page.
pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

/// Display the contact page.
pub async fn contact() -> impl IntoResponse {
    ContactTemplate
}
