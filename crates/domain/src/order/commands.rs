//! Order commands.

use common::{OrderId, UserId};
use serde::Deserialize;

use super::{LineRequest, OrderError, OrderStatus};

/// Command to place a new order.
///
/// Missing fields deserialize as blank so they surface through
/// [`PlaceOrder::validate`] rather than as a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    /// The user placing the order.
    #[serde(default)]
    pub user_id: UserId,

    /// Where the order ships to.
    #[serde(default)]
    pub shipping_address: String,

    /// Requested line items, in the order the client listed them.
    #[serde(default, rename = "line_items")]
    pub lines: Vec<LineRequest>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command.
    pub fn new(
        user_id: impl Into<UserId>,
        shipping_address: impl Into<String>,
        lines: Vec<LineRequest>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            shipping_address: shipping_address.into(),
            lines,
        }
    }

    /// Checks the command's preconditions without touching any store.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.user_id.is_blank() {
            return Err(OrderError::UserIdRequired);
        }

        if self.shipping_address.trim().is_empty() {
            return Err(OrderError::ShippingAddressRequired);
        }

        if self.lines.is_empty() {
            return Err(OrderError::NoLines);
        }

        for line in &self.lines {
            if line.product_id.is_blank() {
                return Err(OrderError::ProductIdRequired);
            }
            if line.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }
        }

        Ok(())
    }

    /// Returns the requested lines with repeated products merged.
    ///
    /// Keeps the position of each product's first occurrence.
    pub fn merged_lines(&self) -> Result<Vec<LineRequest>, OrderError> {
        let mut merged: Vec<LineRequest> = Vec::with_capacity(self.lines.len());

        for line in &self.lines {
            match merged.iter_mut().find(|m| m.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(
                        || OrderError::InvalidQuantity {
                            product_id: line.product_id.clone(),
                            quantity: u32::MAX,
                        },
                    )?;
                }
                None => merged.push(line.clone()),
            }
        }

        Ok(merged)
    }
}

/// Command to move an order to a new status.
#[derive(Debug, Clone)]
pub struct UpdateOrderStatus {
    /// The order to update.
    pub order_id: OrderId,

    /// The requested status.
    pub status: OrderStatus,
}

impl UpdateOrderStatus {
    /// Creates a new UpdateOrderStatus command.
    pub fn new(order_id: impl Into<OrderId>, status: OrderStatus) -> Self {
        Self {
            order_id: order_id.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(lines: Vec<LineRequest>) -> PlaceOrder {
        PlaceOrder::new("user-1", "1 Main St", lines)
    }

    #[test]
    fn test_valid_command() {
        assert!(command(vec![LineRequest::new("SKU-001", 1)]).validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let cmd = PlaceOrder::new(" ", "1 Main St", vec![LineRequest::new("SKU-001", 1)]);
        assert!(matches!(cmd.validate(), Err(OrderError::UserIdRequired)));

        let cmd = PlaceOrder::new("user-1", "", vec![LineRequest::new("SKU-001", 1)]);
        assert!(matches!(
            cmd.validate(),
            Err(OrderError::ShippingAddressRequired)
        ));

        assert!(matches!(
            command(vec![]).validate(),
            Err(OrderError::NoLines)
        ));

        assert!(matches!(
            command(vec![LineRequest::new("", 1)]).validate(),
            Err(OrderError::ProductIdRequired)
        ));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let cmd = command(vec![
            LineRequest::new("SKU-001", 1),
            LineRequest::new("SKU-002", 0),
        ]);
        assert!(matches!(
            cmd.validate(),
            Err(OrderError::InvalidQuantity { quantity: 0, .. })
        ));
    }

    #[test]
    fn test_merged_lines_sum_repeated_products() {
        let cmd = command(vec![
            LineRequest::new("SKU-001", 1),
            LineRequest::new("SKU-002", 4),
            LineRequest::new("SKU-001", 2),
        ]);

        let merged = cmd.merged_lines().unwrap();
        assert_eq!(
            merged,
            vec![LineRequest::new("SKU-001", 3), LineRequest::new("SKU-002", 4)]
        );
    }

    #[test]
    fn test_deserializes_with_missing_fields_as_blank() {
        let cmd: PlaceOrder =
            serde_json::from_str(r#"{"line_items": [{"product_id": "SKU-001", "quantity": 1}]}"#)
                .unwrap();
        assert_eq!(cmd.lines.len(), 1);
        assert!(matches!(cmd.validate(), Err(OrderError::UserIdRequired)));
    }

    #[test]
    fn test_merged_lines_overflow_is_rejected() {
        let cmd = command(vec![
            LineRequest::new("SKU-001", u32::MAX),
            LineRequest::new("SKU-001", 1),
        ]);
        assert!(matches!(
            cmd.merged_lines(),
            Err(OrderError::InvalidQuantity { .. })
        ));
    }
}
