// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::product::Product;

/// 新增商品请求
///
/// 所有字段都必须提供且非空；缺失字段反序列化为空串，由校验统一报错
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddProductDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "price is required"))]
    pub price: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "source is required"))]
    pub source: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "imageUrl is required"))]
    pub image_url: String,
}

impl From<AddProductDto> for Product {
    fn from(dto: AddProductDto) -> Self {
        Product::new(dto.name, dto.url, dto.price, dto.source, dto.image_url)
    }
}

/// 新增商品响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductCreatedDto {
    pub message: String,
    pub id: Uuid,
}

/// 通用消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}
