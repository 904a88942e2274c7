//! Authentication route handlers.
//!
//! Credentials are verified by the backend's auth endpoints; on success the
//! returned user (and bearer token) becomes the session's auth slice.

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

use meridian_core::Email;

use crate::api::AuthResponse;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Turn a backend auth response into the session's auth slice, recording the
/// user on the Sentry scope. Returns the post-login redirect, or a fallback
/// redirect when the session write fails.
async fn establish_session(session: &Session, auth: AuthResponse) -> Response {
    let user = CurrentUser {
        id: auth.user.id,
        name: auth.user.name,
        email: auth.user.email,
        role: auth.user.role,
        token: auth.token,
    };

    if let Err(e) = set_current_user(session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(&user.email));
    Redirect::to("/account").into_response()
}

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/login?error=invalid_email").into_response();
    }

    match state.api().login(&form.email, &form.password).await {
        Ok(auth) => establish_session(&session, auth).await,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    if form.password.len() < 8 {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    if Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/register?error=invalid_email").into_response();
    }

    match state
        .api()
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(auth) => establish_session(&session, auth).await,
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            let message = e.to_string();
            if message.contains("taken") || message.contains("already") {
                Redirect::to("/auth/register?error=email_taken").into_response()
            } else {
                Redirect::to("/auth/register?error=failed").into_response()
            }
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the auth slice and destroys the whole session, cart included.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();
    Redirect::to("/").into_response()
}
