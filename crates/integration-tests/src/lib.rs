//! Integration test harness for Meridian Market.
//!
//! Spins up an in-process fake of the backend REST API plus the real
//! storefront and admin routers, each on an ephemeral localhost port, and
//! drives them over HTTP with a cookie-carrying client. The fake backend
//! records every order-creation and payment-intent call so tests can assert
//! on dispatch counts, not just page contents.
//!
//! # Test Accounts
//!
//! - `shopper@example.com` / `hunter2hunter2` - ordinary user
//! - `admin@example.com` / `hunter2hunter2` - administrator
//!
//! # Catalog
//!
//! Two seeded products: #1 at $100.00 and #2 at $150.00, ten of each in
//! stock. A cart holding one of each reproduces the documented pricing
//! example (subtotal 250, free shipping, tax 12.50, total 262.50).

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};

use meridian_admin::config::AdminConfig;
use meridian_storefront::config::{ApiConfig, StorefrontConfig};

/// High-entropy session secret for test configs (not a real credential).
const TEST_SESSION_SECRET: &str = "kJ9#mP2$vL5@nQ8&rT1*uW4^xZ7!bC3%fG6)hD0(";

/// Password shared by the seeded test accounts.
pub const TEST_PASSWORD: &str = "hunter2hunter2";

/// Seeded shopper account.
pub const SHOPPER_EMAIL: &str = "shopper@example.com";

/// Seeded admin account.
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Everything the fake backend records and serves.
#[derive(Debug, Default)]
pub struct BackendState {
    /// Bodies of every `POST /api/v1/orders`.
    pub order_posts: Vec<Value>,
    /// Bodies of every `POST /api/v1/payments/intent`.
    pub intent_posts: Vec<Value>,
    /// Stock overrides applied after seeding (product id -> stock).
    pub stock_overrides: Vec<(i64, u32)>,
}

/// Shared handle onto the fake backend's recorded state.
pub type SharedBackend = Arc<Mutex<BackendState>>;

fn seeded_products(state: &BackendState) -> Vec<Value> {
    let stock_for = |id: i64, default: u32| {
        state
            .stock_overrides
            .iter()
            .rev()
            .find(|(pid, _)| *pid == id)
            .map_or(default, |(_, stock)| *stock)
    };

    vec![
        json!({
            "id": 1,
            "name": "Vanta Keyboard",
            "description": "Low-profile mechanical keyboard",
            "price": "100.00",
            "stock": stock_for(1, 10),
            "images": ["/img/vanta.png"],
            "category": "peripherals",
            "brand": "Vanta"
        }),
        json!({
            "id": 2,
            "name": "Atlas Monitor Arm",
            "description": "Single-arm desk mount",
            "price": "150.00",
            "stock": stock_for(2, 10),
            "images": [],
            "category": "desk",
            "brand": null
        }),
    ]
}

fn user_json(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({ "id": id, "name": name, "email": email, "role": role })
}

fn seeded_order() -> Value {
    json!({
        "id": 900,
        "items": [{
            "product_id": 1,
            "name": "Vanta Keyboard",
            "price": "100.00",
            "quantity": 2,
            "image": null
        }],
        "shipping": {
            "address": "12 Harbor Lane",
            "city": "Portsmouth",
            "phone": "555-0142",
            "postal_code": "03801",
            "state": "NH",
            "country": "US"
        },
        "amounts": {
            "items_total": "200.00",
            "shipping_total": "25.00",
            "tax_total": "10.00",
            "grand_total": "235.00"
        },
        "payment": { "id": "pi_seed", "status": "succeeded" },
        "status": "paid",
        "created_at": "2026-07-01T09:30:00Z"
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "invalid credentials" })),
    )
        .into_response()
}

async fn list_products(State(state): State<SharedBackend>) -> Json<Value> {
    let state = state.lock().expect("backend state poisoned");
    let products = seeded_products(&state);
    let total = products.len();
    Json(json!({
        "products": products,
        "total_count": total,
        "page": 1,
        "per_page": 10
    }))
}

async fn get_product(State(state): State<SharedBackend>, Path(id): Path<i64>) -> Response {
    let state = state.lock().expect("backend state poisoned");
    match seeded_products(&state)
        .into_iter()
        .find(|p| p["id"] == json!(id))
    {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no such product" })),
        )
            .into_response(),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if password != TEST_PASSWORD {
        return unauthorized();
    }

    match email {
        SHOPPER_EMAIL => Json(json!({
            "token": "tok-shopper",
            "user": user_json(11, "Ada Shopper", SHOPPER_EMAIL, "user")
        }))
        .into_response(),
        ADMIN_EMAIL => Json(json!({
            "token": "tok-admin",
            "user": user_json(12, "Mo Admin", ADMIN_EMAIL, "admin")
        }))
        .into_response(),
        _ => unauthorized(),
    }
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "token": "tok-new",
        "user": user_json(
            42,
            body["name"].as_str().unwrap_or("New User"),
            body["email"].as_str().unwrap_or("new@example.com"),
            "user"
        )
    }))
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some("tok-shopper") => {
            Json(user_json(11, "Ada Shopper", SHOPPER_EMAIL, "user")).into_response()
        }
        Some("tok-admin") => Json(user_json(12, "Mo Admin", ADMIN_EMAIL, "admin")).into_response(),
        _ => unauthorized(),
    }
}

async fn me_update(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    match bearer(&headers) {
        Some("tok-shopper") => Json(user_json(
            11,
            body["name"].as_str().unwrap_or("Ada Shopper"),
            body["email"].as_str().unwrap_or(SHOPPER_EMAIL),
            "user",
        ))
        .into_response(),
        _ => unauthorized(),
    }
}

async fn create_order(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let mut order = body.clone();
    {
        let mut state = state.lock().expect("backend state poisoned");
        state.order_posts.push(body);
        order["id"] = json!(1000 + state.order_posts.len());
    }
    order["status"] = json!("paid");
    order["created_at"] = json!("2026-08-05T10:00:00Z");

    (StatusCode::CREATED, Json(order)).into_response()
}

async fn my_orders(headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    Json(json!([seeded_order()])).into_response()
}

async fn get_order(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    if id == 900 {
        return Json(seeded_order()).into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "no such order" })),
    )
        .into_response()
}

async fn payment_intent(
    State(state): State<SharedBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let mut state = state.lock().expect("backend state poisoned");
    state.intent_posts.push(body);
    Json(json!({ "client_secret": "pi_secret_abc123" })).into_response()
}

async fn publishable_key() -> Json<Value> {
    Json(json!({ "publishable_key": "pk_test_abc123" }))
}

async fn admin_products(State(state): State<SharedBackend>, headers: HeaderMap) -> Response {
    if bearer(&headers) != Some("tok-admin") {
        return unauthorized();
    }
    let state = state.lock().expect("backend state poisoned");
    Json(json!(seeded_products(&state))).into_response()
}

async fn admin_orders(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some("tok-admin") {
        return unauthorized();
    }
    Json(json!([seeded_order()])).into_response()
}

async fn admin_users(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some("tok-admin") {
        return unauthorized();
    }
    Json(json!([
        user_json(11, "Ada Shopper", SHOPPER_EMAIL, "user"),
        user_json(12, "Mo Admin", ADMIN_EMAIL, "admin"),
    ]))
    .into_response()
}

/// Build the fake backend router.
fn backend_router(state: SharedBackend) -> Router {
    Router::new()
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/{id}", get(get_product))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/me", get(me).put(me_update))
        .route("/api/v1/orders", post(create_order).get(my_orders))
        .route("/api/v1/orders/{id}", get(get_order))
        .route("/api/v1/payments/intent", post(payment_intent))
        .route("/api/v1/payments/key", get(publishable_key))
        .route("/api/v1/admin/products", get(admin_products))
        .route("/api/v1/admin/orders", get(admin_orders))
        .route("/api/v1/admin/users", get(admin_users))
        .with_state(state)
}

/// Serve a router on an ephemeral localhost port, returning its address.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    addr
}

/// Everything a test needs: URLs for all three servers plus the backend's
/// recorded state.
pub struct TestContext {
    pub storefront_url: String,
    pub admin_url: String,
    pub backend: SharedBackend,
}

impl TestContext {
    /// Start the fake backend, the storefront, and the admin panel.
    pub async fn start() -> Self {
        let backend: SharedBackend = Arc::new(Mutex::new(BackendState::default()));

        let backend_addr = serve(backend_router(Arc::clone(&backend))).await;
        let api_base_url = format!("http://{backend_addr}");

        let storefront_config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            api: ApiConfig {
                base_url: api_base_url.clone(),
                service_token: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let storefront_state = meridian_storefront::state::AppState::new(storefront_config);
        let storefront_addr = serve(meridian_storefront::router(storefront_state)).await;

        let admin_config = AdminConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            api_base_url,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let admin_state = meridian_admin::state::AppState::new(admin_config);
        let admin_addr = serve(meridian_admin::router(admin_state)).await;

        Self {
            storefront_url: format!("http://{storefront_addr}"),
            admin_url: format!("http://{admin_addr}"),
            backend,
        }
    }

    /// A cookie-carrying client that does not follow redirects, so tests can
    /// assert on them.
    #[must_use]
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build client")
    }

    /// Number of order-creation dispatches the backend has seen.
    #[must_use]
    pub fn order_dispatches(&self) -> usize {
        self.backend
            .lock()
            .expect("backend state poisoned")
            .order_posts
            .len()
    }

    /// Recorded payment-intent request bodies.
    #[must_use]
    pub fn intent_posts(&self) -> Vec<Value> {
        self.backend
            .lock()
            .expect("backend state poisoned")
            .intent_posts
            .clone()
    }

    /// Recorded order-creation request bodies.
    #[must_use]
    pub fn order_posts(&self) -> Vec<Value> {
        self.backend
            .lock()
            .expect("backend state poisoned")
            .order_posts
            .clone()
    }

    /// Override a product's stock for subsequent catalog reads.
    pub fn set_stock(&self, product_id: i64, stock: u32) {
        self.backend
            .lock()
            .expect("backend state poisoned")
            .stock_overrides
            .push((product_id, stock));
    }

    /// Log the shopper in through the storefront, establishing the session
    /// cookie on `client`.
    pub async fn login_shopper(&self, client: &reqwest::Client) {
        let response = client
            .post(format!("{}/auth/login", self.storefront_url))
            .form(&[("email", SHOPPER_EMAIL), ("password", TEST_PASSWORD)])
            .send()
            .await
            .expect("login request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/account")
        );
    }

    /// Add a product to the session cart.
    pub async fn add_to_cart(&self, client: &reqwest::Client, product_id: i64, quantity: u32) {
        let response = client
            .post(format!("{}/cart/add", self.storefront_url))
            .form(&[
                ("product_id", product_id.to_string()),
                ("quantity", quantity.to_string()),
            ])
            .send()
            .await
            .expect("cart add request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    /// Post complete shipping info for the session.
    pub async fn submit_shipping(&self, client: &reqwest::Client) {
        let response = client
            .post(format!("{}/checkout/shipping", self.storefront_url))
            .form(&[
                ("address", "12 Harbor Lane"),
                ("city", "Portsmouth"),
                ("phone", "555-0142"),
                ("postal_code", "03801"),
                ("state", "NH"),
                ("country", "US"),
            ])
            .send()
            .await
            .expect("shipping request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some("/checkout/confirm")
        );
    }
}
