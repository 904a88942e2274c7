//! Session-related types.
//!
//! Types stored in the session for authentication and checkout state.

use serde::{Deserialize, Serialize};

use meridian_core::{Role, UserId};

/// Session-stored user identity.
///
/// Written after a successful login; its absence means the visitor is
/// anonymous. The bearer token is only ever sent to the backend API and never
/// rendered into a view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role flag; gates the admin capability.
    pub role: Role,
    /// Bearer token for authenticated backend calls.
    pub token: String,
}

/// Session keys for per-visitor state.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart slice.
    pub const CART: &str = "cart";

    /// Key for the in-flight checkout session.
    pub const CHECKOUT: &str = "checkout";
}
