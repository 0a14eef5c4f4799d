use async_trait::async_trait;
use common::ProductId;
use storage::{InMemoryStore, KeyValueStore};

use super::{CatalogError, Product, ProductDraft};

/// Persistence boundary for catalog products.
///
/// Every mutating operation is a single read-modify-write on one product;
/// implementations must make each one atomic with respect to other writers
/// of the same product.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Retrieves a product. Returns None if it doesn't exist.
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Returns all products, in no particular order.
    async fn list(&self) -> Result<Vec<Product>, CatalogError>;

    /// Saves a new product. Fails with `AlreadyExists` if the id is taken.
    async fn save(&self, product: Product) -> Result<(), CatalogError>;

    /// Replaces the editable fields of an existing product.
    async fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Product, CatalogError>;

    /// Adds `delta` to a product's stock, refusing to go below zero.
    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CatalogError>;

    /// Removes a product.
    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError>;
}

/// In-memory product store.
#[derive(Clone)]
pub struct InMemoryProductStore {
    products: InMemoryStore<ProductId, Product>,
}

impl InMemoryProductStore {
    /// Creates a new empty product store.
    pub fn new() -> Self {
        Self {
            products: InMemoryStore::new("product"),
        }
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.get(id).await?)
    }

    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.values().await?)
    }

    async fn save(&self, product: Product) -> Result<(), CatalogError> {
        Ok(self.products.insert(product.id().clone(), product).await?)
    }

    async fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Product, CatalogError> {
        self.products
            .update(id, |current| current.replaced_with(draft))
            .await
    }

    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CatalogError> {
        self.products
            .update(id, |current| current.with_stock_delta(delta))
            .await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.products.remove(id).await?;
        Ok(())
    }
}
