// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::product_request::{AddProductDto, MessageDto, ProductCreatedDto};
use crate::domain::models::product::Product;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::presentation::errors::AppError;
use axum::{extract::Path, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// 列出已保存的商品，最新的在前
pub async fn list_products(
    Extension(repo): Extension<Arc<dyn ProductRepository>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = repo.list_recent().await?;
    Ok(Json(products))
}

/// 保存商品
///
/// 所有字段均为必填，校验失败返回 400
pub async fn add_product(
    Extension(repo): Extension<Arc<dyn ProductRepository>>,
    Json(payload): Json<AddProductDto>,
) -> Result<(StatusCode, Json<ProductCreatedDto>), AppError> {
    payload.validate()?;

    let product = repo.create(&Product::from(payload)).await?;
    info!(
        "Product added: id={}, name={}, source={}",
        product.id, product.name, product.source
    );

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedDto {
            message: "Producto agregado exitosamente".to_string(),
            id: product.id,
        }),
    ))
}

/// 删除商品，不存在时返回 404
pub async fn delete_product(
    Extension(repo): Extension<Arc<dyn ProductRepository>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageDto>, AppError> {
    repo.delete(id).await?;
    info!("Product deleted: id={}", id);

    Ok(Json(MessageDto {
        message: "Producto eliminado exitosamente".to_string(),
    }))
}
