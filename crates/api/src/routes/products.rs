//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{Money, Product, ProductDraft};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Omitted fields default to empty/zero and are then rejected by catalog
/// validation where they matter.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub category: String,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        ProductDraft::new(
            req.name,
            req.description,
            Money::from_cents(req.price_cents),
            req.stock,
            req.category,
        )
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub price_with_tax_cents: i64,
    pub stock: u32,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    fn from_product(product: &Product, state: &AppState) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price_cents: product.price().cents(),
            price_with_tax_cents: product.price_with_tax(state.orders.tax_rate()).cents(),
            stock: product.stock(),
            category: product.category().to_string(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

// -- Handlers --

/// POST /products: create a product.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = payload?;
    let product = state.catalog.create_product(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(&product, &state)),
    ))
}

/// GET /products: list all products.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;

    Ok(Json(
        products
            .iter()
            .map(|p| ProductResponse::from_product(p, &state))
            .collect(),
    ))
}

/// GET /products/{id}: load one product.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.get_product(&ProductId::new(id)).await?;
    Ok(Json(ProductResponse::from_product(&product, &state)))
}

/// PUT /products/{id}: replace a product's fields.
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let product = state
        .catalog
        .update_product(&ProductId::new(id), req.into())
        .await?;

    Ok(Json(ProductResponse::from_product(&product, &state)))
}

/// DELETE /products/{id}: remove a product.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_product(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
