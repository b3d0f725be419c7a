// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, mock_browser::MockBrowser, TestApp, API_TOKEN};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

async fn app() -> TestApp {
    create_test_app(MockBrowser::serving("<html></html>")).await
}

fn product(name: &str) -> Value {
    json!({
        "name": name,
        "url": format!("https://www.amazon.es/dp/{}", name),
        "price": "€19.99",
        "source": "Amazon",
        "imageUrl": "https://img.example/p.jpg"
    })
}

async fn add(app: &TestApp, body: &Value) -> axum_test::TestResponse {
    app.server
        .post("/add-product")
        .add_header("Authorization", format!("Bearer {}", API_TOKEN))
        .json(body)
        .await
}

#[tokio::test]
async fn test_add_list_and_delete_product() {
    let app = app().await;

    let created = add(&app, &product("tv")).await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body = created.json::<Value>();
    assert!(body["message"].is_string());
    let id = body["id"].as_str().unwrap().to_string();

    let listed = app.server.get("/products").await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    let products = listed.json::<Value>();
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["id"], id);
    assert_eq!(products[0]["imageUrl"], "https://img.example/p.jpg");

    let deleted = app
        .server
        .delete(&format!("/delete-product/{}", id))
        .add_header("Authorization", format!("Bearer {}", API_TOKEN))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert!(deleted.json::<Value>()["message"].is_string());

    let listed = app.server.get("/products").await;
    assert_eq!(listed.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_products_are_listed_newest_first() {
    let app = app().await;

    for name in ["first", "second", "third"] {
        assert_eq!(add(&app, &product(name)).await.status_code(), StatusCode::CREATED);
        // Distinct creation timestamps
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let products = app.server.get("/products").await.json::<Value>();
    let names: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_add_product_missing_fields_is_400() {
    let app = app().await;

    let response = add(&app, &json!({ "name": "tv", "url": "https://www.amazon.es/dp/1" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_mutations_require_bearer_token() {
    let app = app().await;

    let without = app.server.post("/add-product").json(&product("tv")).await;
    assert_eq!(without.status_code(), StatusCode::UNAUTHORIZED);

    let wrong = app
        .server
        .post("/add-product")
        .add_header("Authorization", "Bearer wrong-token")
        .json(&product("tv"))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let delete = app
        .server
        .delete(&format!("/delete-product/{}", Uuid::new_v4()))
        .await;
    assert_eq!(delete.status_code(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.server.get("/products").await.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_delete_unknown_product_is_404() {
    let app = app().await;

    let response = app
        .server
        .delete(&format!("/delete-product/{}", Uuid::new_v4()))
        .add_header("Authorization", format!("Bearer {}", API_TOKEN))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());
}
