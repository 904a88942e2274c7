//! User management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use meridian_core::{Role, UserId};

use crate::api::{User, UserUpdate};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// User edit form data.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub users: Vec<User>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// User edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub user: User,
    pub is_admin_role: bool,
    pub error: Option<String>,
}

/// Display the user list.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let users = state.api().users(&admin.token).await?;

    Ok(UsersIndexTemplate {
        users,
        error: query.error,
        success: query.success,
    })
}

/// Display the edit form.
#[instrument(skip(state, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let user = state.api().user(&admin.token, UserId::new(id)).await?;

    Ok(UserEditTemplate {
        is_admin_role: user.role.is_admin(),
        user,
        error: query.error,
    })
}

/// Update a user.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let id = UserId::new(id);
    let Ok(role) = form.role.parse::<Role>() else {
        return Ok(Redirect::to(&format!("/users/{id}/edit?error=invalid_role")).into_response());
    };

    let update = UserUpdate {
        name: form.name.trim(),
        email: form.email.trim(),
        role,
    };

    match state.api().update_user(&admin.token, id, &update).await {
        Ok(_) => Ok(Redirect::to("/users?success=updated").into_response()),
        Err(e) => {
            tracing::warn!("User update failed: {e}");
            Ok(Redirect::to(&format!("/users/{id}/edit?error=update_failed")).into_response())
        }
    }
}

/// Delete a user.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state.api().delete_user(&admin.token, UserId::new(id)).await?;

    Ok(Redirect::to("/users?success=deleted").into_response())
}
