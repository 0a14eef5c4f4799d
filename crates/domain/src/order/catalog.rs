use async_trait::async_trait;
use common::ProductId;

use crate::catalog::{CatalogError, CatalogService, Product, ProductStore};

/// The slice of the product catalog that order processing depends on.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Loads the current state of a product.
    async fn product(&self, id: &ProductId) -> Result<Product, CatalogError>;

    /// Adds `delta` to a product's stock, refusing to go below zero.
    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CatalogError>;
}

#[async_trait]
impl<S: ProductStore> ProductCatalog for CatalogService<S> {
    async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.get_product(id).await
    }

    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CatalogError> {
        CatalogService::adjust_stock(self, id, delta).await
    }
}
