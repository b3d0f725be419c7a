// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::price_query::PriceQuery;
use crate::application::use_cases::price_lookup::PriceLookupService;
use crate::domain::models::price::ExtractionResult;
use crate::presentation::errors::AppError;
use axum::{extract::Query, Extension, Json};
use std::sync::Arc;

/// 查询商品价格
///
/// `GET /precio?url=<商品地址>`
pub async fn get_price(
    Extension(service): Extension<Arc<PriceLookupService>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<ExtractionResult>, AppError> {
    let url = query.url.unwrap_or_default();
    let result = service.lookup(&url).await?;
    Ok(Json(result))
}
