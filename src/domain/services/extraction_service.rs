// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use tracing::debug;

use crate::config::settings::ExtractionSettings;
use crate::domain::models::price::ExtractionResult;
use crate::domain::services::rule_set::SiteRules;

/// 字段缺失时的占位值
#[derive(Debug, Clone)]
pub struct FieldDefaults {
    /// 价格未找到时的文本
    pub price_not_found: String,
    /// 图片未找到时的地址
    pub placeholder_image: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            price_not_found: "No encontrado".to_string(),
            placeholder_image: String::new(),
        }
    }
}

impl From<&ExtractionSettings> for FieldDefaults {
    fn from(settings: &ExtractionSettings) -> Self {
        Self {
            price_not_found: settings.price_not_found.clone(),
            placeholder_image: settings.placeholder_image.clone(),
        }
    }
}

/// 提取服务
///
/// 把站点规则应用到渲染后的 HTML 上。每个字段独立解析，
/// 某个字段落空只会得到该字段的占位值，不会影响其他字段，也不会报错。
#[derive(Debug, Clone, Default)]
pub struct ExtractionService {
    defaults: FieldDefaults,
}

impl ExtractionService {
    pub fn new(defaults: FieldDefaults) -> Self {
        Self { defaults }
    }

    /// 提取价格、图片和来源
    ///
    /// # 参数
    ///
    /// * `html_content` - 渲染后的页面 HTML
    /// * `rules` - 已匹配站点的规则
    ///
    /// # 返回值
    ///
    /// 完整的提取结果，缺失字段以占位值填充
    pub fn extract(&self, html_content: &str, rules: &SiteRules) -> ExtractionResult {
        let document = Html::parse_document(html_content);

        let price = rules.price.resolve(&document);
        let image_url = rules.image.resolve(&document);

        if price.is_none() {
            debug!("Price chain exhausted for {}", rules.site);
        }
        if image_url.is_none() {
            debug!("Image chain exhausted for {}", rules.site);
        }

        ExtractionResult {
            price: price.unwrap_or_else(|| self.defaults.price_not_found.clone()),
            image_url: image_url.unwrap_or_else(|| self.defaults.placeholder_image.clone()),
            source: rules.source_label.clone(),
        }
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
