//! Wire types for the backend REST API.
//!
//! These are serde mirrors of the backend's JSON payloads. The backend owns
//! the data model; the storefront holds read-mostly copies and never invents
//! fields of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meridian_core::{Money, OrderId, OrderStatus, PaymentStatus, ProductId, Role, UserId};

use crate::checkout::{OrderQuote, ShippingInfo};
use crate::models::cart::CartItem;

// =============================================================================
// Catalog
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

impl Product {
    /// First image URL, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total matching products across all pages.
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
}

impl ProductPage {
    /// Number of pages needed for `total_count` at `per_page`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total_count.div_ceil(u64::from(self.per_page))
    }
}

// =============================================================================
// Auth & users
// =============================================================================

/// A user record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Successful login/registration response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
    pub user: User,
}

/// Login request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration request body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Profile update request body.
#[derive(Debug, Serialize)]
pub struct ProfileUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

// =============================================================================
// Orders
// =============================================================================

/// One purchased line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price snapshot taken when the item entered the cart.
    pub price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}

/// Payment outcome attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    /// Processor-side payment intent id.
    pub id: String,
    pub status: PaymentStatus,
}

/// Order creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub amounts: OrderQuote,
    pub payment: PaymentResult,
}

/// A persisted order as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub amounts: OrderQuote,
    pub payment: PaymentResult,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payments
// =============================================================================

/// Payment intent creation request.
///
/// `amount` is in minor currency units. The idempotency key is generated once
/// per checkout session so a double submit reuses the same intent.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentRequest {
    pub amount: i64,
    pub shipping: PaymentShipping,
    pub idempotency_key: Uuid,
}

/// Shipping block of a payment intent request.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentShipping {
    pub name: String,
    pub address: PaymentAddress,
    pub phone: String,
}

/// Address block of a payment intent request.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentAddress {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

/// A created payment intent, identified by its client-confirmable secret.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// The processor's publishable SDK key, embedded in the payment view.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishableKey {
    pub publishable_key: String,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_total_pages() {
        let page = ProductPage {
            products: vec![],
            total_count: 21,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let exact = ProductPage {
            products: vec![],
            total_count: 20,
            page: 1,
            per_page: 10,
        };
        assert_eq!(exact.total_pages(), 2);
    }

    #[test]
    fn test_order_item_from_cart_item() {
        let cart_item = CartItem {
            product_id: ProductId::new(3),
            name: "Atlas Monitor".to_string(),
            price: Money::new(Decimal::new(19999, 2)),
            quantity: 2,
            image: Some("/img/atlas.png".to_string()),
            stock: 5,
        };

        let item = OrderItem::from(&cart_item);
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, cart_item.price);
    }

    #[test]
    fn test_product_deserializes_without_optional_fields() {
        let json = r#"{
            "id": 1,
            "name": "Vanta Keyboard",
            "description": "Low-profile mechanical keyboard",
            "price": "89.00",
            "stock": 12,
            "category": "peripherals"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.images.is_empty());
        assert!(product.brand.is_none());
        assert_eq!(product.stock, 12);
    }
}
