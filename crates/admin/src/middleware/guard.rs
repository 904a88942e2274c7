//! Central route guard for the admin panel.
//!
//! The whole binary is admin-gated; the capability table has exactly two
//! public carve-outs (login and health). A session holding a `CurrentAdmin`
//! is the admin role: it is only ever written after the backend confirmed
//! the role at login.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use meridian_core::{Access, Capability, Role, evaluate};

use crate::models::{CurrentAdmin, session_keys};

/// Path prefixes reachable without a session.
const PUBLIC_PREFIXES: &[&str] = &["/login", "/health", "/static"];

/// Resolve the capability a path requires.
#[must_use]
pub fn capability_for(path: &str) -> Capability {
    let public = PUBLIC_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    });

    if public {
        Capability::Public
    } else {
        Capability::Admin
    }
}

/// Evaluate the capability table for this request.
pub async fn guard_middleware(session: Session, request: Request, next: Next) -> Response {
    let required = capability_for(request.uri().path());

    let role: Option<Role> = if required == Capability::Public {
        None
    } else {
        session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .map(|_| Role::Admin)
    };

    match evaluate(required, role) {
        Access::Granted => next.run(request).await,
        Access::RedirectToLogin => Redirect::to("/login").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_and_health_are_public() {
        assert_eq!(capability_for("/login"), Capability::Public);
        assert_eq!(capability_for("/health"), Capability::Public);
        assert_eq!(capability_for("/health/ready"), Capability::Public);
        assert_eq!(capability_for("/static/style.css"), Capability::Public);
    }

    #[test]
    fn test_everything_else_requires_admin() {
        for path in ["/", "/dashboard", "/products", "/orders/1", "/users", "/report"] {
            assert_eq!(capability_for(path), Capability::Admin, "{path}");
        }
    }

    #[test]
    fn test_anonymous_denied_everywhere_gated() {
        for path in ["/dashboard", "/products", "/report"] {
            assert_eq!(
                evaluate(capability_for(path), None),
                Access::RedirectToLogin,
                "{path}"
            );
        }
    }

    #[test]
    fn test_non_admin_role_denied() {
        assert_eq!(
            evaluate(capability_for("/dashboard"), Some(Role::User)),
            Access::RedirectToLogin
        );
    }
}
