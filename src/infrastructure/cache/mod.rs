// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提取结果缓存的内存与 Redis 实现
pub mod cache_strategy;
pub mod redis_client;
