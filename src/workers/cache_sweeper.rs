// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::cache::cache_strategy::{CacheError, CacheStats, CacheStrategy};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 一次清理的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// 本次回收的过期条目数
    pub purged: usize,
    /// 清理后的缓存累计统计
    pub stats: CacheStats,
}

/// 缓存清理工作器
///
/// 定期回收结果缓存中已过期的条目。读取路径本身已经会拒绝过期条目，
/// 这里只负责让内存占用不随历史请求无限增长。
pub struct CacheSweeper {
    cache: Arc<dyn CacheStrategy>,
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(cache: Arc<dyn CacheStrategy>, interval: Duration) -> Self {
        Self {
            cache,
            // tokio::time::interval panics on a zero period
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(
            "Cache sweeper started: backend={}, interval={:?}",
            self.cache.name(),
            self.interval
        );

        let mut interval = tokio::time::interval(self.interval);
        // First tick completes immediately; nothing can be expired yet
        interval.tick().await;

        loop {
            interval.tick().await;

            match self.sweep_once().await {
                Ok(report) => {
                    if report.purged > 0 {
                        info!("Purged {} expired cache entries", report.purged);
                    } else {
                        debug!("Cache sweep found nothing to purge");
                    }
                    debug!(
                        "Cache stats: hits={}, misses={}, stores={}, evictions={}",
                        report.stats.hits,
                        report.stats.misses,
                        report.stats.stores,
                        report.stats.evictions
                    );
                }
                Err(e) => {
                    error!("Failed to purge expired cache entries: {}", e);
                }
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一次清理，并附带当前缓存统计
    pub async fn sweep_once(&self) -> Result<SweepReport, CacheError> {
        let purged = self.cache.purge_expired().await?;
        Ok(SweepReport {
            purged,
            stats: self.cache.get_stats(),
        })
    }
}

#[cfg(test)]
#[path = "cache_sweeper_test.rs"]
mod tests;
