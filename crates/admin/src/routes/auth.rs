//! Admin authentication route handlers.
//!
//! Credentials are checked by the backend; the role flag is checked here
//! before anything is written to the session, so a valid non-admin login
//! never becomes an admin session.

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

use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate { error: query.error }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login(&form.email, &form.password).await {
        Ok(auth) => {
            if !auth.user.role.is_admin() {
                tracing::warn!(user_id = %auth.user.id, "non-admin login attempt on admin panel");
                return Redirect::to("/login?error=not_admin").into_response();
            }

            let admin = CurrentAdmin {
                id: auth.user.id,
                name: auth.user.name,
                email: auth.user.email,
                token: auth.token,
            };

            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }

            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            Redirect::to("/login?error=credentials").into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/login").into_response()
}
