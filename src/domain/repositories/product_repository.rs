// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::Product;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 商品仓库特质
///
/// 定义商品目录数据访问接口，由启动流程注入到处理器中
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 保存新商品
    async fn create(&self, product: &Product) -> Result<Product, RepositoryError>;
    /// 按创建时间倒序列出所有商品
    async fn list_recent(&self) -> Result<Vec<Product>, RepositoryError>;
    /// 删除商品，不存在时返回 `RepositoryError::NotFound`
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
