// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 站点（site）：URL 到受支持站点的分类
/// - 价格（price）：一次提取的结果
/// - 商品（product）：用户保存的商品记录
pub mod price;
pub mod product;
pub mod site;
