//! Route capability predicate.
//!
//! Each route entry in a binary's route table carries a required
//! [`Capability`]. The guard middleware resolves the request path to a
//! capability and calls [`evaluate`] with the session's auth state *before*
//! any handler runs; the outcome is returned as data rather than embedded
//! control flow, so the predicate can be tested without a router.

use serde::{Deserialize, Serialize};

use super::status::Role;

/// What a route requires of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Anyone may view.
    #[default]
    Public,
    /// A user must be loaded in the session.
    Authenticated,
    /// A user must be loaded and carry the admin role.
    Admin,
}

/// The guard's decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Render the view.
    Granted,
    /// No user (or insufficient role); send the visitor to the login view.
    RedirectToLogin,
}

/// Evaluate a required capability against the visitor's auth state.
///
/// `role` is `None` when no user is loaded in the session. An insufficient
/// role never reveals the route's existence differently from a missing
/// session: both redirect to login.
#[must_use]
pub const fn evaluate(required: Capability, role: Option<Role>) -> Access {
    match (required, role) {
        (Capability::Public, _) => Access::Granted,
        (Capability::Authenticated, Some(_)) => Access::Granted,
        (Capability::Admin, Some(Role::Admin)) => Access::Granted,
        (Capability::Authenticated | Capability::Admin, None)
        | (Capability::Admin, Some(Role::User)) => Access::RedirectToLogin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_always_granted() {
        assert_eq!(evaluate(Capability::Public, None), Access::Granted);
        assert_eq!(
            evaluate(Capability::Public, Some(Role::User)),
            Access::Granted
        );
        assert_eq!(
            evaluate(Capability::Public, Some(Role::Admin)),
            Access::Granted
        );
    }

    #[test]
    fn test_authenticated_requires_user() {
        assert_eq!(
            evaluate(Capability::Authenticated, None),
            Access::RedirectToLogin
        );
        assert_eq!(
            evaluate(Capability::Authenticated, Some(Role::User)),
            Access::Granted
        );
        assert_eq!(
            evaluate(Capability::Authenticated, Some(Role::Admin)),
            Access::Granted
        );
    }

    #[test]
    fn test_admin_requires_admin_role() {
        assert_eq!(evaluate(Capability::Admin, None), Access::RedirectToLogin);
        assert_eq!(
            evaluate(Capability::Admin, Some(Role::User)),
            Access::RedirectToLogin
        );
        assert_eq!(
            evaluate(Capability::Admin, Some(Role::Admin)),
            Access::Granted
        );
    }
}
