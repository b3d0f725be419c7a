// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::price_lookup::PriceLookupService;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::presentation::handlers::{price_handler, product_handler};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    middleware,
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由依赖
#[derive(Clone)]
pub struct AppState {
    pub price_service: Arc<PriceLookupService>,
    pub products: Arc<dyn ProductRepository>,
    pub auth: AuthState,
}

/// 创建应用路由
///
/// # 参数
///
/// * `state` - 处理器共享的服务和仓库
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/precio", get(price_handler::get_price))
        .route("/products", get(product_handler::list_products));

    let protected_routes = Router::new()
        .route("/add-product", post(product_handler::add_product))
        .route(
            "/delete-product/{id}",
            delete(product_handler::delete_product),
        )
        .layer(middleware::from_fn_with_state(state.auth, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(state.price_service))
        .layer(Extension(state.products))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
