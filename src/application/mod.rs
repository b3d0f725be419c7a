// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 用例编排领域服务与基础设施，数据传输对象承载 HTTP 载荷
pub mod dto;
pub mod use_cases;
