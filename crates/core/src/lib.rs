//! Meridian Core - Shared types library.
//!
//! This crate provides common types used across all Meridian Market components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal back-office panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no sessions. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, roles,
//!   statuses, and the route-capability predicate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
