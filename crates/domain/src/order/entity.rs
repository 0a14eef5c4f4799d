//! The order entity.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use super::{OrderError, OrderLine, OrderStatus};
use crate::money::{Money, TaxRate};

/// A placed order.
///
/// Lines and totals are fixed at placement. Afterwards only the status and
/// `updated_at` change, and only through [`Order::with_status`], which
/// returns a new value instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    shipping_address: String,
    lines: Vec<OrderLine>,
    subtotal: Money,
    total_with_tax: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new `Pending` order from already validated lines.
    ///
    /// Fails with `TotalOverflow` if the subtotal or the taxed total does not
    /// fit in cents.
    pub(crate) fn place(
        id: OrderId,
        user_id: UserId,
        shipping_address: String,
        lines: Vec<OrderLine>,
        tax_rate: TaxRate,
    ) -> Result<Self, OrderError> {
        let subtotal = lines
            .iter()
            .try_fold(Money::zero(), |acc, line| {
                acc.checked_add(line.checked_line_total()?)
            })
            .ok_or(OrderError::TotalOverflow)?;
        let total_with_tax = tax_rate
            .checked_apply(subtotal)
            .ok_or(OrderError::TotalOverflow)?;
        let now = Utc::now();

        Ok(Self {
            id,
            user_id,
            shipping_address,
            lines,
            subtotal,
            total_with_tax,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns a copy of this order moved to `status`.
    ///
    /// The transition is not checked here; callers validate it against the
    /// state machine first.
    pub(crate) fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of all line totals, before tax.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Subtotal plus tax, rounded to the cent.
    pub fn total_with_tax(&self) -> Money {
        self.total_with_tax
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
