// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{auth_middleware, AuthState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceExt;

fn app(token: Option<&str>) -> Router {
    Router::new()
        .route("/protected", get(|| async { "Protected" }))
        .layer(middleware::from_fn_with_state(
            AuthState::new(token.map(str::to_string)),
            auth_middleware,
        ))
}

async fn call(app: Router, authorization: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().uri("/protected");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }

    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_auth_middleware_missing_header() {
    assert_eq!(call(app(Some("secret")), None).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_middleware_invalid_token() {
    assert_eq!(
        call(app(Some("secret")), Some("Bearer nope")).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        call(app(Some("secret")), Some("secret")).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_auth_middleware_valid_token() {
    assert_eq!(
        call(app(Some("secret")), Some("Bearer secret")).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_auth_middleware_without_configured_token() {
    assert_eq!(call(app(None), Some("Bearer ")).await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        call(app(Some("  ")), Some("Bearer   ")).await,
        StatusCode::UNAUTHORIZED
    );
}
