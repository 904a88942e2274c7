//! Route guard tests: the capability table evaluated over real requests.

use reqwest::StatusCode;

use meridian_integration_tests::{ADMIN_EMAIL, SHOPPER_EMAIL, TEST_PASSWORD, TestContext};

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn anonymous_visitor_bounced_from_authenticated_routes() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();

    for path in [
        "/cart",
        "/checkout/shipping",
        "/checkout/confirm",
        "/checkout/payment",
        "/orders",
        "/orders/900",
        "/account",
    ] {
        let response = client
            .get(format!("{}{path}", ctx.storefront_url))
            .send()
            .await
            .expect("guarded request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/auth/login", "{path}");
    }
}

#[tokio::test]
async fn public_routes_stay_public() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();

    for path in ["/", "/products/1", "/auth/login", "/pages/about"] {
        let response = client
            .get(format!("{}{path}", ctx.storefront_url))
            .send()
            .await
            .expect("public request");
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn authenticated_shopper_reaches_orders() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    let response = client
        .get(format!("{}/orders", ctx.storefront_url))
        .send()
        .await
        .expect("orders request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("orders body");
    assert!(body.contains("#900"), "seeded order missing: {body}");
}

#[tokio::test]
async fn admin_panel_bounces_anonymous_everywhere() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();

    for path in ["/", "/dashboard", "/products", "/orders", "/users", "/report"] {
        let response = client
            .get(format!("{}{path}", ctx.admin_url))
            .send()
            .await
            .expect("admin request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn non_admin_login_is_rejected_by_admin_panel() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();

    // Valid shopper credentials, wrong role flag.
    let response = client
        .post(format!("{}/login", ctx.admin_url))
        .form(&[("email", SHOPPER_EMAIL), ("password", TEST_PASSWORD)])
        .send()
        .await
        .expect("admin login");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=not_admin");

    // And the panel still denies the session.
    let response = client
        .get(format!("{}/dashboard", ctx.admin_url))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn admin_login_reaches_dashboard() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();

    let response = client
        .post(format!("{}/login", ctx.admin_url))
        .form(&[("email", ADMIN_EMAIL), ("password", TEST_PASSWORD)])
        .send()
        .await
        .expect("admin login");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let response = client
        .get(format!("{}/dashboard", ctx.admin_url))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("dashboard body");
    assert!(body.contains("Mo Admin"));
    assert!(body.contains("Products: 2"));
}
