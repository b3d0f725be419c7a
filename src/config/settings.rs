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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、数据库、浏览器渲染池、结果缓存、提取规则、认证和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 浏览器渲染配置
    pub browser: BrowserSettings,
    /// 结果缓存配置
    pub cache: CacheSettings,
    /// 字段提取配置
    pub extraction: ExtractionSettings,
    /// 认证配置
    #[serde(default)]
    pub auth: AuthSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 浏览器渲染配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
    /// 是否以无头模式启动
    pub headless: bool,
    /// 同时进行的渲染数上限
    pub max_concurrency: usize,
    /// 排队等待渲染许可的最长时间（秒）
    pub queue_timeout_secs: u64,
    /// 导航超时时间（秒）
    pub navigation_timeout_secs: u64,
    /// DOM 加载完成后额外等待的时间（毫秒）
    pub settle_delay_ms: u64,
}

impl BrowserSettings {
    pub fn queue_timeout(&self) -> Duration {
        Duration::from_secs(self.queue_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// 结果缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 缓存后端 (memory, redis)
    pub backend: String,
    /// 条目存活时间（秒）
    pub ttl_seconds: u64,
    /// 过期清理间隔（秒）
    pub sweep_interval_seconds: u64,
    /// 内存缓存最大条目数
    pub max_entries: usize,
    /// Redis连接URL (当 backend=redis 时使用)
    pub redis_url: Option<String>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

/// 字段提取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 价格未找到时返回的占位文本
    pub price_not_found: String,
    /// 图片未找到时返回的占位图片地址
    pub placeholder_image: String,
    /// 外部规则文件路径，未设置时使用内置规则表
    pub rules_path: Option<String>,
}

/// 认证配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// 修改商品目录所需的 Bearer 令牌，未设置时拒绝所有写操作
    pub api_token: Option<String>,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载代码内默认值、`config/default`、`config/{APP_ENVIRONMENT}`，
    /// 最后由 `PRICEWATCH__` 前缀的环境变量覆盖
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB settings
            .set_default("database.url", "sqlite://pricewatch.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default render pool settings
            .set_default("browser.headless", true)?
            .set_default("browser.max_concurrency", 4)?
            .set_default("browser.queue_timeout_secs", 30)?
            .set_default("browser.navigation_timeout_secs", 30)?
            .set_default("browser.settle_delay_ms", 0)?
            // Default cache settings: 30 minute TTL, swept on the same period
            .set_default("cache.backend", "memory")?
            .set_default("cache.ttl_seconds", 1800)?
            .set_default("cache.sweep_interval_seconds", 1800)?
            .set_default("cache.max_entries", 10000)?
            // Default extraction fallbacks
            .set_default("extraction.price_not_found", "No encontrado")?
            .set_default("extraction.placeholder_image", "")?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PRICEWATCH").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
