// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::Product;
use crate::domain::repositories::product_repository::{ProductRepository, RepositoryError};
use crate::infrastructure::database::entities::product;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 商品仓库实现
#[derive(Clone)]
pub struct ProductRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ProductRepositoryImpl {
    /// 创建新的商品仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        let model = product::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            url: Set(product.url.clone()),
            price: Set(product.price.clone()),
            source: Set(product.source.clone()),
            image_url: Set(product.image_url.clone()),
            created_at: Set(product.created_at.into()),
        };

        let saved = model.insert(self.db.as_ref()).await?;
        Ok(saved.into())
    }

    async fn list_recent(&self) -> Result<Vec<Product>, RepositoryError> {
        let models = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = product::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
            price: model.price,
            source: model.source,
            image_url: model.image_url,
            created_at: model.created_at.into(),
        }
    }
}
