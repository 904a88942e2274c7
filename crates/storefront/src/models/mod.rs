//! Domain models for the storefront.
//!
//! Everything here lives in the visitor's session: the authenticated user,
//! the cart, and the in-flight checkout. Catalog and order data are fetched
//! per request from the backend API and never stored locally.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartItem};
pub use session::{CurrentUser, session_keys};
