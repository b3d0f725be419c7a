// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 价格提取结果
///
/// 每次请求新建或从缓存取出，从不部分构造：
/// 站点无法识别时不会产生任何结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// 价格文本，未找到时为占位文本
    pub price: String,
    /// 商品图片地址，未找到时为占位图片
    pub image_url: String,
    /// 来源站点标签
    pub source: String,
}
