//! Backend admin API client.
//!
//! High-privilege counterpart to the storefront's client: full product,
//! order, user, and review CRUD. Every call is made with the logged-in
//! admin's bearer token; the backend enforces the role server-side, this
//! binary's guard enforces it at the view layer. No caching: back-office
//! reads want live data.

pub mod types;

pub use types::*;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use meridian_core::{OrderId, OrderStatus, ProductId, ReviewId, UserId};

/// Errors that can occur when calling the backend admin API.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend rejected the request (4xx with a message body).
    #[error("{0}")]
    Rejected(String),

    /// Backend failure (5xx).
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },
}

/// Client for the backend's admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(api_base_url: &str) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: api_base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.inner.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AdminApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(AdminApiError::from);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map_or_else(|_| body.chars().take(200).collect::<String>(), |e| e.message);

        match status.as_u16() {
            404 => Err(AdminApiError::NotFound(message)),
            401 | 403 => Err(AdminApiError::Unauthorized(message)),
            400..=499 => Err(AdminApiError::Rejected(message)),
            code => {
                tracing::error!(status = code, message = %message, "backend API error");
                Err(AdminApiError::Backend {
                    status: code,
                    message,
                })
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, AdminApiError> {
        self.send(self.inner.client.get(self.url(path)).bearer_auth(token))
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, AdminApiError> {
        self.send(
            self.inner
                .client
                .post(self.url(path))
                .bearer_auth(token)
                .json(body),
        )
        .await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, AdminApiError> {
        self.send(
            self.inner
                .client
                .put(self.url(path))
                .bearer_auth(token)
                .json(body),
        )
        .await
    }

    async fn delete(&self, path: &str, token: &str) -> Result<(), AdminApiError> {
        let response = self
            .inner
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map_or_else(|_| body.chars().take(200).collect::<String>(), |e| e.message);

        match status.as_u16() {
            404 => Err(AdminApiError::NotFound(message)),
            401 | 403 => Err(AdminApiError::Unauthorized(message)),
            400..=499 => Err(AdminApiError::Rejected(message)),
            code => Err(AdminApiError::Backend {
                status: code,
                message,
            }),
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticate; role checking happens at the caller.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AdminApiError> {
        self.send(
            self.inner
                .client
                .post(self.url("/auth/login"))
                .json(&LoginRequest { email, password }),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn products(&self, token: &str) -> Result<Vec<Product>, AdminApiError> {
        self.get("/admin/products", token).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn product(&self, token: &str, id: ProductId) -> Result<Product, AdminApiError> {
        self.get(&format!("/admin/products/{id}"), token).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draft.
    #[instrument(skip(self, token, draft))]
    pub async fn create_product(
        &self,
        token: &str,
        draft: &ProductDraft,
    ) -> Result<Product, AdminApiError> {
        self.post("/admin/products", token, draft).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draft.
    #[instrument(skip(self, token, draft))]
    pub async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, AdminApiError> {
        self.put(&format!("/admin/products/{id}"), token, draft)
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), AdminApiError> {
        self.delete(&format!("/admin/products/{id}"), token).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &str) -> Result<Vec<Order>, AdminApiError> {
        self.get("/admin/orders", token).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn order(&self, token: &str, id: OrderId) -> Result<Order, AdminApiError> {
        self.get(&format!("/admin/orders/{id}"), token).await
    }

    /// Request an order lifecycle transition.
    ///
    /// The backend owns the lifecycle and may refuse illegal transitions.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::Rejected` for refused transitions.
    #[instrument(skip(self, token))]
    pub async fn update_order_status(
        &self,
        token: &str,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, AdminApiError> {
        self.put(
            &format!("/admin/orders/{id}/status"),
            token,
            &StatusUpdate { status },
        )
        .await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn delete_order(&self, token: &str, id: OrderId) -> Result<(), AdminApiError> {
        self.delete(&format!("/admin/orders/{id}"), token).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn users(&self, token: &str) -> Result<Vec<User>, AdminApiError> {
        self.get("/admin/users", token).await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn user(&self, token: &str, id: UserId) -> Result<User, AdminApiError> {
        self.get(&format!("/admin/users/{id}"), token).await
    }

    /// Update a user's name, email, or role.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, token, update))]
    pub async fn update_user(
        &self,
        token: &str,
        id: UserId,
        update: &UserUpdate<'_>,
    ) -> Result<User, AdminApiError> {
        self.put(&format!("/admin/users/{id}"), token, update).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn delete_user(&self, token: &str, id: UserId) -> Result<(), AdminApiError> {
        self.delete(&format!("/admin/users/{id}"), token).await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// List reviews for one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn reviews(
        &self,
        token: &str,
        product_id: ProductId,
    ) -> Result<Vec<Review>, AdminApiError> {
        self.get(&format!("/admin/reviews?product_id={product_id}"), token)
            .await
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `AdminApiError::NotFound` for unknown ids.
    #[instrument(skip(self, token))]
    pub async fn delete_review(&self, token: &str, id: ReviewId) -> Result<(), AdminApiError> {
        self.delete(&format!("/admin/reviews/{id}"), token).await
    }
}
