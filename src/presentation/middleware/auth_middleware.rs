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

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 配置的访问令牌，未配置时拒绝所有受保护请求
    pub api_token: Option<Arc<str>>,
}

impl AuthState {
    pub fn new(api_token: Option<String>) -> Self {
        Self {
            // An empty token would let `Bearer ` through
            api_token: api_token
                .filter(|token| !token.trim().is_empty())
                .map(Arc::from),
        }
    }
}

/// 认证中间件
///
/// 校验 `Authorization: Bearer <token>` 是否与配置的令牌一致
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(Response)` - 401 及 `{"error": ...}`
pub async fn auth_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    debug!("AuthMiddleware processing path: {}", req.uri().path());

    let Some(expected) = state.api_token.as_deref() else {
        warn!("Rejected {}: no api token configured", req.uri().path());
        return Err(unauthorized("Acceso no autorizado"));
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Token no proporcionado"))?;

    if token != expected {
        warn!("Invalid api token for {}", req.uri().path());
        return Err(unauthorized("Token inválido"));
    }

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
