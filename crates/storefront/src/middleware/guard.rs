//! Central route guard.
//!
//! Routes declare what they require in a capability table; this middleware
//! resolves the request path against the table and evaluates the predicate
//! against the session's auth slice before any handler or template runs.
//! The decision comes back as data (`Access`) and is turned into exactly one
//! kind of control flow here: a redirect to the login view.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use meridian_core::{Access, Capability, Role, evaluate};

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// One entry of the capability table: a path prefix and what it requires.
#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    prefix: &'static str,
    capability: Capability,
}

/// The declarative route-capability table for one binary.
///
/// Rules are checked in order; the first matching prefix wins, and anything
/// unmatched is public. A prefix matches the path itself and any segment
/// below it (`/orders` matches `/orders` and `/orders/7`, not `/ordersx`).
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    login_path: &'static str,
}

impl RouteTable {
    /// The storefront's table: the cart, checkout, orders, and the account
    /// area need a logged-in user; browsing and auth stay public.
    #[must_use]
    pub fn storefront() -> Self {
        Self {
            rules: vec![
                RouteRule {
                    prefix: "/cart",
                    capability: Capability::Authenticated,
                },
                RouteRule {
                    prefix: "/checkout",
                    capability: Capability::Authenticated,
                },
                RouteRule {
                    prefix: "/orders",
                    capability: Capability::Authenticated,
                },
                RouteRule {
                    prefix: "/account",
                    capability: Capability::Authenticated,
                },
            ],
            login_path: "/auth/login",
        }
    }

    /// Where denied visitors are sent.
    #[must_use]
    pub const fn login_path(&self) -> &'static str {
        self.login_path
    }

    /// Resolve the capability a path requires.
    #[must_use]
    pub fn capability_for(&self, path: &str) -> Capability {
        self.rules
            .iter()
            .find(|rule| prefix_matches(rule.prefix, path))
            .map_or(Capability::Public, |rule| rule.capability)
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Evaluate the capability table for this request.
///
/// Runs inside the session layer: the auth slice is read once here and the
/// verdict applied before the route's handler is constructed.
pub async fn guard_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let table = state.route_table();
    let required = table.capability_for(request.uri().path());

    let role: Option<Role> = if required == Capability::Public {
        // Public routes never need the session read.
        None
    } else {
        session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .map(|user| user.role)
    };

    match evaluate(required, role) {
        Access::Granted => next.run(request).await,
        Access::RedirectToLogin => Redirect::to(table.login_path()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matches_whole_segments() {
        assert!(prefix_matches("/orders", "/orders"));
        assert!(prefix_matches("/orders", "/orders/7"));
        assert!(!prefix_matches("/orders", "/ordersx"));
        assert!(!prefix_matches("/orders", "/order"));
    }

    #[test]
    fn test_storefront_table() {
        let table = RouteTable::storefront();

        assert_eq!(table.capability_for("/"), Capability::Public);
        assert_eq!(table.capability_for("/products/3"), Capability::Public);
        assert_eq!(table.capability_for("/auth/login"), Capability::Public);

        assert_eq!(table.capability_for("/cart"), Capability::Authenticated);
        assert_eq!(
            table.capability_for("/checkout/shipping"),
            Capability::Authenticated
        );
        assert_eq!(table.capability_for("/orders"), Capability::Authenticated);
        assert_eq!(
            table.capability_for("/account"),
            Capability::Authenticated
        );
    }

    #[test]
    fn test_anonymous_denied_on_authenticated_routes() {
        let table = RouteTable::storefront();
        for path in ["/cart", "/checkout/shipping", "/checkout/confirm", "/orders", "/orders/12", "/account"] {
            let required = table.capability_for(path);
            assert_eq!(
                evaluate(required, None),
                Access::RedirectToLogin,
                "anonymous visitor should be bounced from {path}"
            );
        }
    }
}
