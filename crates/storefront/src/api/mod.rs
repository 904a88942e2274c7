//! Backend REST API client.
//!
//! The backend (`/api/v1`) owns products, users, orders, and payment-intent
//! creation; this client is the storefront's only way to reach them. Catalog
//! reads are cached with `moka` (2-minute TTL). Authenticated calls carry the
//! bearer token obtained at login.

pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use meridian_core::ProductId;

use crate::config::ApiConfig;

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(120);

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
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

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Page(Arc<ProductPage>),
    Product(Arc<Product>),
}

/// Client for the backend REST API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    service_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                service_token: config
                    .service_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.inner.base_url)
    }

    /// Attach auth to a request: the user's bearer token if present,
    /// otherwise the service token (catalog reads).
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token.or(self.inner.service_token.as_deref()) {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    /// Send a request and decode the JSON response, mapping non-2xx statuses
    /// to typed errors.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(ApiError::from);
        }

        // Non-2xx: the backend attaches {"message": ...}; fall back to the
        // raw body when it doesn't.
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map_or_else(|_| body.chars().take(200).collect::<String>(), |e| e.message);

        match status.as_u16() {
            404 => Err(ApiError::NotFound(message)),
            401 | 403 => Err(ApiError::Unauthorized(message)),
            400..=499 => Err(ApiError::Rejected(message)),
            code => {
                tracing::error!(status = code, message = %message, "backend API error");
                Err(ApiError::Backend {
                    status: code,
                    message,
                })
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.inner.client.get(self.url(path)), token)
            .query(query);
        self.send(request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.inner.client.post(self.url(path)), token)
            .json(body);
        self.send(request).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.inner.client.put(self.url(path)), token)
            .json(body);
        self.send(request).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch one page of products, optionally filtered by a search keyword.
    ///
    /// Results are cached per (keyword, page) for a short TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        keyword: Option<&str>,
        page: u32,
    ) -> Result<Arc<ProductPage>, ApiError> {
        let cache_key = format!("products:{}:{page}", keyword.unwrap_or(""));
        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            return Ok(page);
        }

        let mut query = vec![("page", page.to_string())];
        if let Some(keyword) = keyword {
            query.push(("keyword", keyword.to_string()));
        }

        let page: ProductPage = self.get("/products", None, &query).await?;
        let page = Arc::new(page);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(Arc::clone(&page)))
            .await;
        Ok(page)
    }

    /// Fetch a single product by id. Cached for a short TTL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Arc<Product>, ApiError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            return Ok(product);
        }

        let product: Product = self.get(&format!("/products/{id}"), None, &[]).await?;
        let product = Arc::new(product);
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    /// Fetch a product fresh from the backend, bypassing and refreshing the
    /// cache. Used when stock is re-validated at checkout confirmation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn product_uncached(&self, id: ProductId) -> Result<Arc<Product>, ApiError> {
        let product: Product = self.get(&format!("/products/{id}"), None, &[]).await?;
        let product = Arc::new(product);
        self.inner
            .cache
            .insert(
                format!("product:{id}"),
                CacheValue::Product(Arc::clone(&product)),
            )
            .await;
        Ok(product)
    }

    // =========================================================================
    // Auth & profile
    // =========================================================================

    /// Authenticate and obtain a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", None, &LoginRequest { email, password })
            .await
    }

    /// Create an account and obtain a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the email is already taken.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.post(
            "/auth/register",
            None,
            &RegisterRequest {
                name,
                email,
                password,
            },
        )
        .await
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is stale.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &str) -> Result<User, ApiError> {
        self.get("/me", Some(token), &[]).await
    }

    /// Update the authenticated user's name and email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, token))]
    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate<'_>,
    ) -> Result<User, ApiError> {
        self.put("/me", Some(token), update).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Persist a completed order.
    ///
    /// Called exactly once per successful payment confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails to store the order.
    #[instrument(skip(self, token, draft))]
    pub async fn create_order(&self, token: &str, draft: &OrderDraft) -> Result<Order, ApiError> {
        self.post("/orders", Some(token), draft).await
    }

    /// Fetch the authenticated user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        self.get("/orders", Some(token), &[]).await
    }

    /// Fetch one of the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown or foreign order ids.
    #[instrument(skip(self, token))]
    pub async fn order(&self, token: &str, id: meridian_core::OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}"), Some(token), &[]).await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Create a payment intent and return its client-confirmable secret.
    ///
    /// The idempotency key inside `request` makes retried calls return the
    /// same intent instead of minting a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend or processor rejects the request.
    #[instrument(skip(self, token, request))]
    pub async fn create_payment_intent(
        &self,
        token: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ApiError> {
        self.post("/payments/intent", Some(token), request).await
    }

    /// Fetch the processor's publishable key for the card-capture SDK.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn publishable_key(&self) -> Result<PublishableKey, ApiError> {
        self.get("/payments/key", None, &[]).await
    }
}
