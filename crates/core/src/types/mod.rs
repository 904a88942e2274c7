//! Core types for Meridian Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod capability;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use capability::{Access, Capability, evaluate};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use status::*;
