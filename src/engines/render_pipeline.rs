// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserDriver, BrowserPage, RenderError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// 渲染管线选项
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// 同时进行的渲染数上限
    pub max_concurrency: usize,
    /// 排队等待许可的最长时间
    pub queue_timeout: Duration,
    /// 导航加抓取 HTML 的总超时
    pub navigation_timeout: Duration,
    /// 页面加载完成后额外等待的时间，给客户端渲染留出时间
    pub settle_delay: Duration,
}

impl From<&BrowserSettings> for RenderOptions {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            max_concurrency: settings.max_concurrency.max(1),
            queue_timeout: settings.queue_timeout(),
            navigation_timeout: settings.navigation_timeout(),
            settle_delay: settings.settle_delay(),
        }
    }
}

/// 渲染管线
///
/// 负责浏览器页面的完整生命周期：获取渲染许可、打开页面、导航、等待、
/// 抓取 HTML，并且在任何退出路径上都关闭页面。
///
/// 并发渲染数受信号量限制，超出上限的请求排队，排队超时后返回
/// `RenderError::Busy`。
#[derive(Clone)]
pub struct RenderPipeline {
    driver: Arc<dyn BrowserDriver>,
    permits: Arc<Semaphore>,
    options: RenderOptions,
}

impl RenderPipeline {
    pub fn new(driver: Arc<dyn BrowserDriver>, options: RenderOptions) -> Self {
        let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
        Self {
            driver,
            permits,
            options,
        }
    }

    /// 当前空闲的渲染许可数
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    /// 渲染页面并返回完整 HTML
    ///
    /// 实际工作在独立任务中运行：即使调用方被取消（例如客户端断开），
    /// 页面依然会被关闭、许可依然会被归还。
    ///
    /// # 参数
    ///
    /// * `url` - 目标地址
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 渲染后的 HTML
    /// * `Err(RenderError)` - 启动、导航、超时或排队失败，不会返回部分 HTML
    pub async fn render(&self, url: &str) -> Result<String, RenderError> {
        let pipeline = self.clone();
        let url = url.to_string();

        tokio::spawn(async move { pipeline.render_scoped(&url).await })
            .await
            .map_err(|e| RenderError::Capture(format!("Render task aborted: {}", e)))?
    }

    async fn render_scoped(&self, url: &str) -> Result<String, RenderError> {
        let _permit = match tokio::time::timeout(
            self.options.queue_timeout,
            self.permits.clone().acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(RenderError::PoolClosed),
            Err(_) => {
                warn!("Render queue timed out for {}", url);
                return Err(RenderError::Busy(self.options.max_concurrency));
            }
        };

        let start = Instant::now();
        metrics::counter!("pricewatch_renders_total").increment(1);

        let result = self.render_with_page(url).await;

        metrics::histogram!("pricewatch_render_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        if let Err(ref e) = result {
            metrics::counter!("pricewatch_render_failures_total").increment(1);
            warn!("Render failed for {}: {}", url, e);
        } else {
            debug!("Rendered {} in {:?}", url, start.elapsed());
        }

        result
    }

    async fn render_with_page(&self, url: &str) -> Result<String, RenderError> {
        let mut page = self.driver.open_page().await?;

        let outcome = tokio::time::timeout(
            self.options.navigation_timeout,
            Self::capture(page.as_mut(), url, self.options.settle_delay),
        )
        .await;

        // Release on every path before looking at the outcome
        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", url, e);
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(self.options.navigation_timeout)),
        }
    }

    async fn capture(
        page: &mut dyn BrowserPage,
        url: &str,
        settle_delay: Duration,
    ) -> Result<String, RenderError> {
        page.navigate(url).await?;

        // Trades latency for content that client-side scripts add after load
        if !settle_delay.is_zero() {
            tokio::time::sleep(settle_delay).await;
        }

        page.content().await
    }
}
