//! End-to-end tests for health checks, custom fields and the middleware stack.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use commerce_fields_integration_tests::TestContext;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get(ctx.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_readiness_follows_magento() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), 503);

    ctx.magento
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .body_contains("\"operationName\":\"Ping\"");
            then.status(200).json_body(json!({"data": {"__typename": "Query"}}));
        })
        .await;

    let response = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_store_header_is_forwarded() {
    let ctx = TestContext::with_env(&[("MAGENTO_STORE_CODE", "default")])
        .await
        .unwrap();
    let mock = ctx
        .magento
        .mock_async(|when, then| {
            when.method(POST).path("/graphql").header("store", "default");
            then.status(200).json_body(json!({"data": {"__typename": "Query"}}));
        })
        .await;

    let response = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "strapi-req-7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "strapi-req-7");

    let response = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let ctx = TestContext::with_env(&[(
        "COMMERCE_FIELDS_CORS_ORIGINS",
        "https://cms.example.com, https://staging-cms.example.com",
    )])
    .await
    .unwrap();

    let response = ctx
        .client
        .get(ctx.url("/health"))
        .header("origin", "https://staging-cms.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://staging-cms.example.com"
    );
}

#[tokio::test]
async fn test_custom_field_registry() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get_json("/custom-fields").await.unwrap();

    assert_eq!(status, 200);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "commerce_category_input",
            "commerce_categories_input",
            "commerce_category_product_input",
            "commerce_product_input",
        ]
    );
}

#[tokio::test]
async fn test_normalize_legacy_category_product_value() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post(ctx.url("/custom-fields/commerce_category_product_input/normalize"))
        .json(&json!("{\"category\":\"MjA=\",\"product\":\"24-MB01\"}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"category": "MjA=", "products": ["24-MB01"]}));
}
