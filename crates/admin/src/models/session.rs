//! Session-related types.

use serde::{Deserialize, Serialize};

use meridian_core::UserId;

/// Session-stored admin identity.
///
/// Only written after the backend confirmed the admin role at login; the
/// guard re-checks nothing but presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's backend user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Bearer token for backend admin calls.
    pub token: String,
}

/// Session keys for admin state.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
