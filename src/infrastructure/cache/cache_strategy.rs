// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::settings::CacheSettings;
use crate::domain::models::price::ExtractionResult;
use crate::infrastructure::cache::redis_client::RedisClient;

/// 缓存错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    /// Redis 访问失败
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    /// 缓存值无法序列化或反序列化
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 缓存配置错误
    #[error("Cache configuration error: {0}")]
    Config(String),
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct StatsCounter {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
}

impl StatsCounter {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("pricewatch_cache_hits_total").increment(1);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("pricewatch_cache_misses_total").increment(1);
    }

    fn store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    fn evicted(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// 缓存条目
#[derive(Debug, Clone)]
struct CacheEntry {
    value: ExtractionResult,
    inserted_at: Instant,
}

impl CacheEntry {
    fn new(value: ExtractionResult) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    // An entry is dead from the instant its TTL has fully elapsed
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// 结果缓存策略接口
///
/// 键为请求 URL 的精确字符串。缓存只是优化层：
/// 任何实现都不能在条目超过 TTL 后继续返回它。
#[async_trait]
pub trait CacheStrategy: Send + Sync {
    /// 获取缓存值
    async fn get(&self, key: &str) -> Result<Option<ExtractionResult>, CacheError>;

    /// 设置缓存值，TTL 从写入时刻开始计算
    async fn set(&self, key: &str, value: ExtractionResult) -> Result<(), CacheError>;

    /// 清理已过期的条目，返回清理数量
    async fn purge_expired(&self) -> Result<usize, CacheError>;

    /// 获取缓存统计信息
    fn get_stats(&self) -> CacheStats;

    /// 策略名称
    fn name(&self) -> &'static str;
}

/// 内存缓存策略
///
/// 基于 DashMap 的并发安全实现。读取时惰性判断过期，
/// 另由后台清理任务定期回收。
pub struct MemoryCacheStrategy {
    cache: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    stats: StatsCounter,
}

impl MemoryCacheStrategy {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
            stats: StatsCounter::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn evict_if_needed(&self) {
        if self.cache.len() <= self.max_entries {
            return;
        }

        let ttl = self.ttl;
        let before = self.cache.len();
        self.cache.retain(|_, entry| !entry.is_expired(ttl));

        let current_size = self.cache.len();
        if current_size > self.max_entries {
            // 多淘汰10%，避免每次写入都触发淘汰
            let to_evict =
                (current_size - self.max_entries + self.max_entries / 10).min(current_size);

            // Drop the oldest insertions first
            let mut entries: Vec<(String, Instant)> = self
                .cache
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().inserted_at))
                .collect();
            entries.sort_by_key(|(_, inserted_at)| *inserted_at);

            for (key, _) in entries.into_iter().take(to_evict) {
                self.cache.remove(&key);
            }
        }

        let evicted = before.saturating_sub(self.cache.len());
        self.stats.evicted(evicted as u64);
        debug!("Evicted {} entries from memory cache", evicted);
    }
}

#[async_trait]
impl CacheStrategy for MemoryCacheStrategy {
    async fn get(&self, key: &str) -> Result<Option<ExtractionResult>, CacheError> {
        let ttl = self.ttl;

        // Expiry is judged on the same read that yields the value
        if let Some(entry) = self.cache.get(key) {
            if !entry.is_expired(ttl) {
                self.stats.hit();
                return Ok(Some(entry.value.clone()));
            }
        }

        // Re-checked under the shard lock, so a fresh concurrent insert survives
        if self
            .cache
            .remove_if(key, |_, entry| entry.is_expired(ttl))
            .is_some()
        {
            debug!("Cache entry expired for key: {}", key);
        }

        self.stats.miss();
        Ok(None)
    }

    async fn set(&self, key: &str, value: ExtractionResult) -> Result<(), CacheError> {
        self.cache.insert(key.to_string(), CacheEntry::new(value));
        self.stats.store();
        self.evict_if_needed();

        debug!("Stored extraction result in memory cache for key: {}", key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let ttl = self.ttl;
        let before = self.cache.len();
        self.cache.retain(|_, entry| !entry.is_expired(ttl));
        let purged = before.saturating_sub(self.cache.len());

        self.stats.evicted(purged as u64);
        Ok(purged)
    }

    fn get_stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Redis缓存策略
///
/// 过期交给 Redis 的 SETEX 处理
pub struct RedisCacheStrategy {
    redis_client: RedisClient,
    ttl: Duration,
    stats: StatsCounter,
}

impl RedisCacheStrategy {
    pub fn new(redis_client: RedisClient, ttl: Duration) -> Self {
        Self {
            redis_client,
            ttl,
            stats: StatsCounter::default(),
        }
    }

    fn generate_cache_key(key: &str) -> String {
        format!("pricewatch:precio:{}", key)
    }
}

#[async_trait]
impl CacheStrategy for RedisCacheStrategy {
    async fn get(&self, key: &str) -> Result<Option<ExtractionResult>, CacheError> {
        let cache_key = Self::generate_cache_key(key);

        match self.redis_client.get(&cache_key).await? {
            Some(json_str) => {
                let result: ExtractionResult = serde_json::from_str(&json_str)?;
                self.stats.hit();
                debug!("Cache hit for key: {}", key);
                Ok(Some(result))
            }
            None => {
                self.stats.miss();
                debug!("Cache miss for key: {}", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: ExtractionResult) -> Result<(), CacheError> {
        let cache_key = Self::generate_cache_key(key);
        let json_str = serde_json::to_string(&value)?;

        self.redis_client
            .set(&cache_key, &json_str, self.ttl.as_secs().max(1))
            .await?;
        self.stats.store();

        debug!("Stored extraction result in Redis cache for key: {}", key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        Ok(0)
    }

    fn get_stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// 缓存策略工厂
pub struct CacheStrategyFactory;

impl CacheStrategyFactory {
    /// 按配置创建缓存策略
    ///
    /// # 参数
    ///
    /// * `settings` - 缓存配置
    ///
    /// # 返回值
    ///
    /// * `Ok(Arc<dyn CacheStrategy>)` - 内存或 Redis 策略
    /// * `Err(CacheError)` - 未知后端或 Redis 地址缺失/无效
    pub fn create_strategy(settings: &CacheSettings) -> Result<Arc<dyn CacheStrategy>, CacheError> {
        let strategy: Arc<dyn CacheStrategy> = match settings.backend.as_str() {
            "memory" => Arc::new(MemoryCacheStrategy::new(
                settings.ttl(),
                settings.max_entries,
            )),
            "redis" => {
                let url = settings.redis_url.as_deref().ok_or_else(|| {
                    CacheError::Config("cache.redis_url is required for the redis backend".into())
                })?;
                Arc::new(RedisCacheStrategy::new(RedisClient::new(url)?, settings.ttl()))
            }
            other => {
                return Err(CacheError::Config(format!(
                    "unknown cache backend `{}`",
                    other
                )))
            }
        };

        info!(
            "Result cache initialized: backend={}, ttl={:?}",
            strategy.name(),
            settings.ttl()
        );
        Ok(strategy)
    }
}
