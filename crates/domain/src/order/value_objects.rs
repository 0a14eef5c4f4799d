//! Value objects for the order domain.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::money::Money;

/// A requested line item: which product and how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    /// The product to order.
    #[serde(default)]
    pub product_id: ProductId,

    /// Units requested.
    #[serde(default)]
    pub quantity: u32,
}

impl LineRequest {
    /// Creates a new line request.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A line of a placed order.
///
/// Name and unit price are snapshots taken when the order was placed, so
/// later catalog edits never change an existing order's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product identifier.
    pub product_id: ProductId,

    /// Product name at the time of ordering.
    pub product_name: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit at the time of ordering.
    pub unit_price: Money,
}

impl OrderLine {
    /// Snapshots a product's name and price for `quantity` units.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id().clone(),
            product_name: product.name().to_string(),
            quantity,
            unit_price: product.price(),
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Like [`OrderLine::line_total`], but `None` when the product overflows.
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply(self.quantity)
    }
}
