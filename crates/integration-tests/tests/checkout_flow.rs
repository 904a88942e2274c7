//! End-to-end checkout workflow tests.
//!
//! Drives the storefront over HTTP against the fake backend and asserts on
//! the backend's recorded order-creation and payment-intent calls.

use reqwest::StatusCode;

use meridian_integration_tests::TestContext;

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn confirm_without_shipping_redirects_to_shipping() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;
    ctx.add_to_cart(&client, 1, 1).await;

    let response = client
        .get(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/checkout/shipping");
}

#[tokio::test]
async fn confirm_shows_reference_pricing() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    // [{price:100, qty:1}, {price:150, qty:1}] -> 250 / 0 / 12.50 / 262.50
    ctx.add_to_cart(&client, 1, 1).await;
    ctx.add_to_cart(&client, 2, 1).await;
    ctx.submit_shipping(&client).await;

    let response = client
        .get(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("confirm body");
    assert!(body.contains("$250.00"), "subtotal missing: {body}");
    assert!(body.contains("$0.00"), "free shipping missing");
    assert!(body.contains("$12.50"), "tax missing");
    assert!(body.contains("$262.50"), "total missing");
}

#[tokio::test]
async fn flat_shipping_fee_below_threshold() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    // One $100 item: subtotal <= 200, so shipping is 25 and tax 5.00.
    ctx.add_to_cart(&client, 1, 1).await;
    ctx.submit_shipping(&client).await;

    let body = client
        .get(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm request")
        .text()
        .await
        .expect("confirm body");

    assert!(body.contains("$100.00"));
    assert!(body.contains("$25.00"));
    assert!(body.contains("$5.00"));
    assert!(body.contains("$130.00"));
}

#[tokio::test]
async fn successful_payment_dispatches_one_order_and_clears_cart() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 1).await;
    ctx.add_to_cart(&client, 2, 1).await;
    ctx.submit_shipping(&client).await;

    // Confirm fixes the quote into the checkout session.
    let response = client
        .post(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm post");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/checkout/payment");

    // The payment page creates the intent server-side.
    let response = client
        .get(format!("{}/checkout/payment", ctx.storefront_url))
        .send()
        .await
        .expect("payment page");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("payment body");
    assert!(body.contains("pi_secret_abc123"), "client secret missing");
    assert!(body.contains("pk_test_abc123"), "publishable key missing");

    let intents = ctx.intent_posts();
    assert_eq!(intents.len(), 1);
    let intent = intents.first().expect("one intent");
    assert_eq!(intent["amount"], 26250, "amount must be in minor units");
    assert_eq!(intent["shipping"]["address"]["city"], "Portsmouth");

    // Processor confirms; the browser posts the outcome back.
    let response = client
        .post(format!("{}/checkout/payment/complete", ctx.storefront_url))
        .form(&[("intent_id", "pi_123"), ("status", "succeeded")])
        .send()
        .await
        .expect("payment complete");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/checkout/success"));

    // Exactly one order-creation dispatch, carrying the payment result.
    let orders = ctx.order_posts();
    assert_eq!(orders.len(), 1);
    let order = orders.first().expect("one order");
    assert_eq!(order["payment"]["status"], "succeeded");
    assert_eq!(order["payment"]["id"], "pi_123");
    assert_eq!(order["amounts"]["grand_total"], "262.50");
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    // The cart was cleared on completion.
    let body = client
        .get(format!("{}/cart", ctx.storefront_url))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(body.contains("Your cart is empty"), "cart not cleared: {body}");
}

#[tokio::test]
async fn failed_payment_dispatches_no_order_and_keeps_cart() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 1).await;
    ctx.submit_shipping(&client).await;

    let response = client
        .post(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm post");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{}/checkout/payment/complete", ctx.storefront_url))
        .form(&[("intent_id", "pi_123"), ("status", "card_declined")])
        .send()
        .await
        .expect("payment complete");

    // Back to the payment form with a flash; the form re-enables there.
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/checkout/payment?error=payment_failed");

    assert_eq!(ctx.order_dispatches(), 0);

    let body = client
        .get(format!("{}/cart", ctx.storefront_url))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(
        body.contains("Vanta Keyboard"),
        "cart should survive a failed payment"
    );
}

#[tokio::test]
async fn payment_page_refresh_reuses_idempotency_key() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 1).await;
    ctx.submit_shipping(&client).await;
    client
        .post(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm post");

    for _ in 0..2 {
        let response = client
            .get(format!("{}/checkout/payment", ctx.storefront_url))
            .send()
            .await
            .expect("payment page");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let intents = ctx.intent_posts();
    assert_eq!(intents.len(), 2);
    let first_key = &intents.first().expect("first intent")["idempotency_key"];
    let second_key = &intents.get(1).expect("second intent")["idempotency_key"];
    assert!(first_key.is_string());
    assert_eq!(
        first_key, second_key,
        "a refresh must reuse the checkout's idempotency key"
    );
}

#[tokio::test]
async fn stock_change_bounces_back_to_cart() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 3).await;
    ctx.submit_shipping(&client).await;

    // Someone else bought the stock out from under the cart.
    ctx.set_stock(1, 1);

    let response = client
        .get(format!("{}/checkout/confirm", ctx.storefront_url))
        .send()
        .await
        .expect("confirm request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart?error=stock_changed");
    assert_eq!(ctx.order_dispatches(), 0);
}

#[tokio::test]
async fn cart_add_merges_lines_by_product() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 2).await;
    ctx.add_to_cart(&client, 1, 3).await;

    let body = client
        .get(format!("{}/cart", ctx.storefront_url))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");

    // One line with quantity 5, not two lines.
    assert_eq!(body.matches("Vanta Keyboard").count(), 1);
    assert!(body.contains("value=\"5\""), "merged quantity missing: {body}");
    assert!(body.contains("$500.00"), "line total missing");
}
