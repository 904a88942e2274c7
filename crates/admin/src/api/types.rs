//! Wire types for the backend's admin endpoints.
//!
//! Serde mirrors of the backend's JSON payloads, scoped to what the back
//! office reads and writes. The storefront keeps its own, narrower mirrors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meridian_core::{Money, OrderId, OrderStatus, PaymentStatus, ProductId, ReviewId, Role, UserId};

// =============================================================================
// Products
// =============================================================================

/// A catalog product as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
    pub images: Vec<String>,
    pub category: String,
    pub brand: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping block on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub phone: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

/// Amounts block on an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderAmounts {
    pub items_total: Money,
    pub shipping_total: Money,
    pub tax_total: Money,
    pub grand_total: Money,
}

/// One purchased line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

/// Payment outcome attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    pub status: PaymentStatus,
}

/// A persisted order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub amounts: OrderAmounts,
    pub payment: PaymentResult,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Order status update request body.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Users
// =============================================================================

/// A user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Fields for updating a user.
#[derive(Debug, Serialize)]
pub struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: Role,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Login request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

// =============================================================================
// Reviews
// =============================================================================

/// A product review.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: String,
    pub reviewer: String,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
