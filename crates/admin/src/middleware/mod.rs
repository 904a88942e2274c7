//! HTTP middleware stack for the admin panel.
//!
//! Session layer plus the capability guard. Every route except the login
//! view and the health checks requires an admin in the session.

pub mod auth;
pub mod guard;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use guard::guard_middleware;
pub use session::create_session_layer;
