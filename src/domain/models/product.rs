// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 商品实体
///
/// 用户保存的商品记录，价格、图片和来源通常来自一次价格查询的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 商品唯一标识符
    pub id: Uuid,
    /// 商品名称
    pub name: String,
    /// 商品页面地址
    pub url: String,
    /// 保存时的价格文本
    pub price: String,
    /// 来源站点标签
    pub source: String,
    /// 商品图片地址
    pub image_url: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// 创建一个新的商品记录
    ///
    /// # 返回值
    ///
    /// 返回一个新的Product实例，包含生成的唯一ID和当前时间戳
    pub fn new(
        name: String,
        url: String,
        price: String,
        source: String,
        image_url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            url,
            price,
            source,
            image_url,
            created_at: Utc::now(),
        }
    }
}
