//! Admin report aggregation and export tests.

use reqwest::StatusCode;

use meridian_integration_tests::{ADMIN_EMAIL, TEST_PASSWORD, TestContext};

async fn admin_client(ctx: &TestContext) -> reqwest::Client {
    let client = TestContext::client();
    let response = client
        .post(format!("{}/login", ctx.admin_url))
        .form(&[("email", ADMIN_EMAIL), ("password", TEST_PASSWORD)])
        .send()
        .await
        .expect("admin login");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    client
}

#[tokio::test]
async fn report_aggregates_fetched_collections() {
    let ctx = TestContext::start().await;
    let client = admin_client(&ctx).await;

    let response = client
        .get(format!("{}/report", ctx.admin_url))
        .send()
        .await
        .expect("report request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("report body");
    assert!(body.contains("Total Products:</b> 2"), "{body}");
    assert!(body.contains("Total Orders:</b> 1"));
    assert!(body.contains("Total Users:</b> 2"));
    // Seeded order totals 235.00; no products are out of stock.
    assert!(body.contains("$235.00"));
    assert!(body.contains("Out of Stock Products:</b> 0"));
}

#[tokio::test]
async fn report_counts_out_of_stock_products() {
    let ctx = TestContext::start().await;
    ctx.set_stock(2, 0);
    let client = admin_client(&ctx).await;

    let body = client
        .get(format!("{}/report", ctx.admin_url))
        .send()
        .await
        .expect("report request")
        .text()
        .await
        .expect("report body");

    assert!(body.contains("Out of Stock Products:</b> 1"), "{body}");
}

#[tokio::test]
async fn report_pdf_downloads() {
    let ctx = TestContext::start().await;
    let client = admin_client(&ctx).await;

    let response = client
        .get(format!("{}/report/pdf", ctx.admin_url))
        .send()
        .await
        .expect("report pdf request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    assert!(
        response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("admin-report.pdf"))
    );

    let bytes = response.bytes().await.expect("pdf bytes");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn order_report_pdf_downloads_from_checkout() {
    let ctx = TestContext::start().await;
    let client = TestContext::client();
    ctx.login_shopper(&client).await;

    ctx.add_to_cart(&client, 1, 1).await;
    ctx.submit_shipping(&client).await;

    let response = client
        .get(format!("{}/checkout/confirm/report", ctx.storefront_url))
        .send()
        .await
        .expect("order report request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("order_report.pdf"))
    );

    let bytes = response.bytes().await.expect("pdf bytes");
    assert!(bytes.starts_with(b"%PDF"));
}
