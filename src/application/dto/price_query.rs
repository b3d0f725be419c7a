// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 价格查询参数
///
/// `url` 可选，缺失时由用例返回校验错误而不是让提取器拒绝请求
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub url: Option<String>,
}
