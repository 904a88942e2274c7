//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Route guard (capability table, evaluated before any handler)

pub mod auth;
pub mod guard;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use guard::{RouteTable, guard_middleware};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
