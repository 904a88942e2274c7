//! Account (profile) route handlers.

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

use crate::api::ProfileUpdate;
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, set_current_user};
use crate::state::AppState;

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub name: String,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Profile edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "account/edit.html")]
pub struct ProfileEditTemplate {
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

/// Display the profile page.
#[instrument(skip(user))]
pub async fn profile(
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    ProfileTemplate {
        name: user.name,
        email: user.email,
        error: query.error,
        success: query.success,
    }
}

/// Display the profile edit form.
#[instrument(skip(user))]
pub async fn edit_profile(
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    ProfileEditTemplate {
        name: user.name,
        email: user.email,
        error: query.error,
    }
}

/// Handle profile update form submission.
#[instrument(skip(state, session, user, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    if form.name.trim().is_empty() {
        return Ok(Redirect::to("/account/edit?error=name_required").into_response());
    }
    if Email::parse(&form.email).is_err() {
        return Ok(Redirect::to("/account/edit?error=invalid_email").into_response());
    }

    match state
        .api()
        .update_profile(
            &user.token,
            &ProfileUpdate {
                name: &form.name,
                email: &form.email,
            },
        )
        .await
    {
        Ok(updated) => {
            // Refresh the auth slice so views show the new values.
            let mut current = user;
            current.name = updated.name;
            current.email = updated.email;
            set_current_user(&session, &current).await?;

            Ok(Redirect::to("/account?success=updated").into_response())
        }
        Err(e) => {
            tracing::warn!("Profile update failed: {e}");
            Ok(Redirect::to("/account/edit?error=update_failed").into_response())
        }
    }
}
