// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod mock_browser;

use axum::Router;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use pricewatch::application::use_cases::price_lookup::PriceLookupService;
use pricewatch::config::settings::DatabaseSettings;
use pricewatch::domain::repositories::product_repository::ProductRepository;
use pricewatch::domain::services::extraction_service::{ExtractionService, FieldDefaults};
use pricewatch::domain::services::rule_set::ExtractionRuleSet;
use pricewatch::engines::render_pipeline::{RenderOptions, RenderPipeline};
use pricewatch::infrastructure::cache::cache_strategy::MemoryCacheStrategy;
use pricewatch::infrastructure::database::connection;
use pricewatch::infrastructure::repositories::product_repo_impl::ProductRepositoryImpl;
use pricewatch::presentation::middleware::auth_middleware::AuthState;
use pricewatch::presentation::routes::{self, AppState};
use std::sync::Arc;
use std::time::Duration;

use self::mock_browser::MockBrowser;

pub const API_TOKEN: &str = "test-token";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub browser: Arc<MockBrowser>,
}

/// 构建完整路由，浏览器替换为脚本化驱动，数据库使用迁移后的 SQLite 内存库
pub async fn build_router(browser: Arc<MockBrowser>, api_token: Option<&str>) -> Router {
    let db = connection::create_pool(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
    })
    .await
    .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let pipeline = RenderPipeline::new(
        browser,
        RenderOptions {
            max_concurrency: 2,
            queue_timeout: Duration::from_secs(5),
            navigation_timeout: Duration::from_secs(5),
            settle_delay: Duration::ZERO,
        },
    );

    let price_service = Arc::new(PriceLookupService::new(
        Arc::new(ExtractionRuleSet::builtin().expect("Built-in rules must load")),
        ExtractionService::new(FieldDefaults::default()),
        Arc::new(MemoryCacheStrategy::new(Duration::from_secs(1800), 100)),
        pipeline,
    ));
    let products: Arc<dyn ProductRepository> =
        Arc::new(ProductRepositoryImpl::new(Arc::new(db)));

    routes::routes(AppState {
        price_service,
        products,
        auth: AuthState::new(api_token.map(str::to_string)),
    })
}

pub async fn create_test_app(browser: Arc<MockBrowser>) -> TestApp {
    let router = build_router(browser.clone(), Some(API_TOKEN)).await;
    let server = TestServer::new(router).expect("Failed to start test server");
    TestApp { server, browser }
}
