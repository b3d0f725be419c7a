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

use pricewatch::application::use_cases::price_lookup::PriceLookupService;
use pricewatch::config::settings::Settings;
use pricewatch::domain::repositories::product_repository::ProductRepository;
use pricewatch::domain::services::extraction_service::{ExtractionService, FieldDefaults};
use pricewatch::domain::services::rule_set::ExtractionRuleSet;
use pricewatch::engines::chromium_engine::{ChromiumDriver, ChromiumOptions};
use pricewatch::engines::render_pipeline::{RenderOptions, RenderPipeline};
use pricewatch::engines::traits::BrowserDriver;
use pricewatch::infrastructure::cache::cache_strategy::CacheStrategyFactory;
use pricewatch::infrastructure::database::connection;
use pricewatch::infrastructure::repositories::product_repo_impl::ProductRepositoryImpl;
use pricewatch::presentation::middleware::auth_middleware::AuthState;
use pricewatch::presentation::routes::{self, AppState};
use pricewatch::workers::cache_sweeper::CacheSweeper;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};
use pricewatch::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting pricewatch...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    pricewatch::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Extraction rules are immutable for the life of the process
    let rules = Arc::new(ExtractionRuleSet::load(
        settings.extraction.rules_path.as_deref(),
    )?);
    info!(
        "Extraction rules loaded from {}",
        settings
            .extraction
            .rules_path
            .as_deref()
            .unwrap_or("built-in table")
    );

    // 5. Result cache and its sweeper
    let cache = CacheStrategyFactory::create_strategy(&settings.cache)?;
    let sweeper = CacheSweeper::new(cache.clone(), settings.cache.sweep_interval()).start();

    // 6. Render pipeline
    let driver: Arc<dyn BrowserDriver> = Arc::new(ChromiumDriver::new(ChromiumOptions::from(
        &settings.browser,
    )));
    let pipeline = RenderPipeline::new(driver.clone(), RenderOptions::from(&settings.browser));
    info!(
        "Render pipeline ready: driver={}, max_concurrency={}",
        driver.name(),
        settings.browser.max_concurrency
    );

    let price_service = Arc::new(PriceLookupService::new(
        rules,
        ExtractionService::new(FieldDefaults::from(&settings.extraction)),
        cache,
        pipeline,
    ));
    let products: Arc<dyn ProductRepository> = Arc::new(ProductRepositoryImpl::new(db.clone()));

    let auth = AuthState::new(settings.auth.api_token.clone());
    if auth.api_token.is_none() {
        warn!("auth.api_token is not set; product mutations will be rejected");
    }

    // 7. Start HTTP server
    let app = routes::routes(AppState {
        price_service,
        products,
        auth,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 8. Release background resources
    sweeper.abort();
    if let Err(e) = driver.shutdown().await {
        warn!("Failed to shut down browser: {}", e);
    }
    info!("pricewatch stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
