// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, mock_browser::MockBrowser};
use axum::http::StatusCode;
use serde_json::{json, Value};

const AMAZON_HTML: &str = r#"<html><body>
    <div class="a-price"><span class="a-offscreen">€19.99</span></div>
</body></html>"#;

const MEDIAMARKT_HTML: &str = r#"<html><head>
    <meta property="og:image" content="https://assets.mmsrg.com/tv.jpg">
</head><body>
    <span data-test="branded-price-whole-value">499,</span>
    <span data-test="branded-price-decimal-value">99</span>
    <span data-test="branded-price-currency">€</span>
</body></html>"#;

#[tokio::test]
async fn test_precio_amazon_example() {
    let app = create_test_app(MockBrowser::serving(AMAZON_HTML)).await;

    let response = app
        .server
        .get("/precio")
        .add_query_param("url", "https://www.amazon.example/dp/123")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "price": "€19.99", "imageUrl": "", "source": "Amazon" })
    );
    assert_eq!(app.browser.renders(), 1);
    assert_eq!(app.browser.closed(), 1);
}

#[tokio::test]
async fn test_precio_second_request_is_served_from_cache() {
    let app = create_test_app(MockBrowser::serving(AMAZON_HTML)).await;
    let url = "https://www.amazon.example/dp/123";

    let first = app.server.get("/precio").add_query_param("url", url).await;
    let second = app.server.get("/precio").add_query_param("url", url).await;

    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(first.json::<Value>(), second.json::<Value>());
    assert_eq!(app.browser.renders(), 1);
}

#[tokio::test]
async fn test_precio_mediamarkt_split_price() {
    let app = create_test_app(MockBrowser::serving(MEDIAMARKT_HTML)).await;

    let response = app
        .server
        .get("/precio")
        .add_query_param("url", "https://www.mediamarkt.es/es/product/_tv-1.html")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["source"], "MediaMarkt");
    assert_eq!(body["imageUrl"], "https://assets.mmsrg.com/tv.jpg");
    assert_eq!(body["price"], "499,99€");
}

#[tokio::test]
async fn test_precio_missing_url_is_400() {
    let app = create_test_app(MockBrowser::serving(AMAZON_HTML)).await;

    let response = app.server.get("/precio").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(app.browser.renders(), 0);
}

#[tokio::test]
async fn test_precio_unsupported_site_is_400_without_render() {
    let app = create_test_app(MockBrowser::serving(AMAZON_HTML)).await;

    let response = app
        .server
        .get("/precio")
        .add_query_param("url", "https://www.ebay.example/itm/1")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(app.browser.renders(), 0);
}

#[tokio::test]
async fn test_precio_malformed_url_is_400() {
    let app = create_test_app(MockBrowser::serving(AMAZON_HTML)).await;

    for url in ["amazon", "ftp://www.amazon.example/dp/1", "http://10.0.0.1/?amazon"] {
        let response = app.server.get("/precio").add_query_param("url", url).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", url);
    }
    assert_eq!(app.browser.renders(), 0);
}

#[tokio::test]
async fn test_precio_render_failure_is_500() {
    let app = create_test_app(MockBrowser::failing()).await;

    let response = app
        .server
        .get("/precio")
        .add_query_param("url", "https://www.pccomponentes.com/portatil")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"].is_string());
    assert_eq!(app.browser.renders(), 1);
    assert_eq!(app.browser.closed(), 1);
}
