// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::models::price::ExtractionResult;
use crate::domain::models::site::SiteId;
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::rule_set::ExtractionRuleSet;
use crate::engines::render_pipeline::RenderPipeline;
use crate::engines::traits::RenderError;
use crate::engines::validators::{validate_url, UrlValidationError};
use crate::infrastructure::cache::cache_strategy::CacheStrategy;

/// 价格查询错误类型
#[derive(Error, Debug)]
pub enum LookupError {
    /// 参数缺失或格式错误
    #[error("{0}")]
    Validation(#[from] UrlValidationError),
    /// 不属于任何受支持的站点
    #[error("Sitio no soportado: {0}")]
    Unsupported(String),
    /// 页面渲染失败
    #[error("Error al obtener la página: {0}")]
    Render(#[from] RenderError),
}

/// 价格查询用例
///
/// 负责一次完整的查询流程：校验 → 站点识别 → 查缓存 →
/// 渲染 → 提取 → 写缓存。不受支持的 URL 不会触发任何渲染。
pub struct PriceLookupService {
    rules: Arc<ExtractionRuleSet>,
    extractor: ExtractionService,
    cache: Arc<dyn CacheStrategy>,
    renderer: RenderPipeline,
}

impl PriceLookupService {
    pub fn new(
        rules: Arc<ExtractionRuleSet>,
        extractor: ExtractionService,
        cache: Arc<dyn CacheStrategy>,
        renderer: RenderPipeline,
    ) -> Self {
        Self {
            rules,
            extractor,
            cache,
            renderer,
        }
    }

    /// 查询商品价格和图片
    ///
    /// 缓存键是去掉首尾空白后的 URL 原文，不做任何规范化。
    /// 缓存读写失败只记录日志并按未命中处理。
    ///
    /// # 参数
    ///
    /// * `raw_url` - 调用方传入的 URL
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractionResult)` - 提取结果（可能来自缓存）
    /// * `Err(LookupError)` - 校验失败、站点不受支持或渲染失败
    pub async fn lookup(&self, raw_url: &str) -> Result<ExtractionResult, LookupError> {
        let url = raw_url.trim();
        validate_url(url)?;

        let site = SiteId::classify(url);
        let Some(rules) = self.rules.get(site) else {
            metrics::counter!("pricewatch_unsupported_total").increment(1);
            debug!("Rejected unsupported url: {}", url);
            return Err(LookupError::Unsupported(url.to_string()));
        };

        match self.cache.get(url).await {
            Ok(Some(cached)) => {
                debug!("Serving {} from cache", url);
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {}: {}", url, e),
        }

        let html_content = self.renderer.render(url).await?;
        let result = self.extractor.extract(&html_content, rules);

        if let Err(e) = self.cache.set(url, result.clone()).await {
            warn!("Cache write failed for {}: {}", url, e);
        }

        info!("Looked up {} ({}): price={}", url, site, result.price);
        Ok(result)
    }
}

#[cfg(test)]
#[path = "price_lookup_test.rs"]
mod tests;
