//! Catalog service validating product changes before they reach the store.

use common::ProductId;

use super::{CatalogError, Product, ProductDraft, ProductStore};

/// Service for managing catalog products.
///
/// Wraps a [`ProductStore`] and enforces the catalog invariants (non-blank
/// name, positive price, non-negative stock) on every write.
#[derive(Clone)]
pub struct CatalogService<S: ProductStore> {
    store: S,
}

impl<S: ProductStore> CatalogService<S> {
    /// Creates a new catalog service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a product with a freshly generated id.
    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = Product::create(ProductId::generate(), draft)?;
        self.store.save(product.clone()).await?;

        metrics::counter!("catalog_products_created_total").increment(1);
        tracing::info!(product_id = %product.id(), "product created");

        Ok(product)
    }

    /// Lists all products, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.store.list().await?;
        products.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(products)
    }

    /// Loads a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Replaces a product's editable fields.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        draft.validate()?;
        let product = self.store.update(id, draft).await?;

        tracing::info!(product_id = %id, stock = product.stock(), "product updated");
        Ok(product)
    }

    /// Adds `delta` to a product's stock.
    ///
    /// Negative deltas reserve stock, positive ones release it. Fails with
    /// `InsufficientStock` if the stock would drop below zero.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CatalogError> {
        match self.store.adjust_stock(id, delta).await {
            Ok(product) => {
                metrics::counter!("catalog_stock_adjustments_total").increment(1);
                tracing::debug!(product_id = %id, delta, stock = product.stock(), "stock adjusted");
                Ok(product)
            }
            Err(e) => {
                tracing::debug!(product_id = %id, delta, error = %e, "stock adjustment refused");
                Err(e)
            }
        }
    }

    /// Deletes a product.
    ///
    /// Pending orders referencing the product are not checked.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.store.delete(id).await?;

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
