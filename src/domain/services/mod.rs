// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 规则表（rule_set）：每个站点的价格/图片回退选择器链
/// - 提取服务（extraction_service）：把规则应用到渲染后的 HTML
pub mod extraction_service;
pub mod rule_set;
