// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 价格查询用例和数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 站点识别、提取规则表、提取服务和商品仓库接口
pub mod domain;

/// 引擎模块
///
/// 无头浏览器驱动和有界渲染流水线
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库、缓存和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和中间件
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 后台缓存清理
pub mod workers;
