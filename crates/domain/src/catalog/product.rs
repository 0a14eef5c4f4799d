use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::money::{Money, TaxRate};

/// Highest accepted unit price: $10,000,000.00.
pub const MAX_PRICE: Money = Money::from_cents(1_000_000_000);

/// Highest stock level accepted on create or update.
pub const MAX_STOCK: u32 = 1_000_000_000;

/// The client-editable fields of a product, as submitted on create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    /// Signed so that negative input can be rejected with a validation error.
    pub stock: i64,
    #[serde(default)]
    pub category: String,
}

impl ProductDraft {
    /// Creates a new draft.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            stock,
            category: category.into(),
        }
    }

    /// Checks the catalog invariants, returning the stock as an unsigned count.
    ///
    /// Price and stock are bounded by [`MAX_PRICE`] and [`MAX_STOCK`], so the
    /// value of a product's whole stock, tax included, always fits in cents.
    pub fn validate(&self) -> Result<u32, CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::NameRequired);
        }

        if !self.price.is_positive() || self.price > MAX_PRICE {
            return Err(CatalogError::InvalidPrice {
                price_cents: self.price.cents(),
            });
        }

        u32::try_from(self.stock)
            .ok()
            .filter(|stock| *stock <= MAX_STOCK)
            .ok_or(CatalogError::InvalidStock { stock: self.stock })
    }
}

/// A catalog product.
///
/// Values are never edited in place: every change produces a new `Product`
/// that the store swaps in under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    stock: u32,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a validated product from a draft.
    pub fn create(id: ProductId, draft: ProductDraft) -> Result<Self, CatalogError> {
        let stock = draft.validate()?;
        let now = Utc::now();

        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description,
            price: draft.price,
            stock,
            category: draft.category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns a copy with every editable field replaced by `draft`.
    ///
    /// The id and creation time are kept.
    pub fn replaced_with(&self, draft: ProductDraft) -> Result<Self, CatalogError> {
        let stock = draft.validate()?;

        Ok(Self {
            id: self.id.clone(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            price: draft.price,
            stock,
            category: draft.category,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }

    /// Returns a copy with `delta` added to the stock.
    ///
    /// Fails with `InsufficientStock` if the result would drop below zero.
    pub fn with_stock_delta(&self, delta: i64) -> Result<Self, CatalogError> {
        let new_stock = i64::from(self.stock) + delta;

        if new_stock < 0 {
            return Err(CatalogError::InsufficientStock {
                product_id: self.id.clone(),
                product_name: self.name.clone(),
                available: self.stock,
                requested: delta.unsigned_abs(),
            });
        }

        let stock = u32::try_from(new_stock)
            .map_err(|_| CatalogError::InvalidStock { stock: new_stock })?;

        Ok(Self {
            stock,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if at least `quantity` units are in stock.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Returns the unit price including tax.
    pub fn price_with_tax(&self, rate: TaxRate) -> Money {
        rate.apply(self.price)
    }
}
