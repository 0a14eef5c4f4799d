//! Order service: placement with stock reservation, and the status lifecycle.

use std::time::Instant;

use common::{OrderId, ProductId, UserId};
use storage::KeyedLocks;

use super::{
    Order, OrderError, OrderLine, OrderStatus, OrderStore, PlaceOrder, ProductCatalog,
    UpdateOrderStatus,
};
use crate::catalog::CatalogError;
use crate::money::TaxRate;

/// Direction of a stock change made on behalf of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StockMove {
    /// Take units out of stock (order placement).
    Reserve,
    /// Put units back into stock (cancellation or rollback).
    Release,
}

impl StockMove {
    fn delta(self, quantity: u32) -> i64 {
        match self {
            StockMove::Reserve => -i64::from(quantity),
            StockMove::Release => i64::from(quantity),
        }
    }

    fn inverse(self) -> Self {
        match self {
            StockMove::Reserve => StockMove::Release,
            StockMove::Release => StockMove::Reserve,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            StockMove::Reserve => "reserve",
            StockMove::Release => "release",
        }
    }
}

/// A stock move that failed on one product after earlier ones were undone.
struct FailedMove {
    product_id: ProductId,
    source: CatalogError,
}

/// Service for placing orders and driving them through their lifecycle.
///
/// Stock is reserved against the catalog when an order is placed and
/// released again when it is cancelled. Neither step is a storage-level
/// transaction: when a multi-line move fails partway, the lines already
/// moved are compensated before the error is returned.
pub struct OrderService<O: OrderStore, C: ProductCatalog> {
    orders: O,
    catalog: C,
    tax_rate: TaxRate,
    transitions: KeyedLocks<OrderId>,
}

impl<O: OrderStore, C: ProductCatalog> OrderService<O, C> {
    /// Creates a new order service.
    pub fn new(orders: O, catalog: C, tax_rate: TaxRate) -> Self {
        Self {
            orders,
            catalog,
            tax_rate,
            transitions: KeyedLocks::new(),
        }
    }

    /// Returns the tax rate applied to new orders.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Returns a reference to the underlying order store.
    pub fn orders(&self) -> &O {
        &self.orders
    }

    /// Returns a reference to the catalog used for stock moves.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Places an order, reserving stock for every line.
    ///
    /// Every line is checked against the catalog before any stock moves. If
    /// a reservation still fails (another order took the stock in between),
    /// the lines reserved so far are released and no order is stored.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id, lines = cmd.lines.len()))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self.try_place_order(cmd).await;

        match &result {
            Ok(order) => {
                let duration = started.elapsed().as_secs_f64();
                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_create_duration_seconds").record(duration);
                tracing::info!(
                    order_id = %order.id(),
                    total_cents = order.total_with_tax().cents(),
                    duration,
                    "order placed"
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.reason()).increment(1);
                tracing::info!(error = %e, "order rejected");
            }
        }

        result
    }

    async fn try_place_order(&self, cmd: PlaceOrder) -> Result<Order, OrderError> {
        cmd.validate()?;
        let requested = cmd.merged_lines()?;

        let mut lines = Vec::with_capacity(requested.len());
        for request in &requested {
            let product = self.catalog.product(&request.product_id).await?;
            if !product.has_stock(request.quantity) {
                return Err(OrderError::InsufficientStock {
                    product_id: product.id().clone(),
                    product_name: product.name().to_string(),
                    available: product.stock(),
                    requested: request.quantity,
                });
            }
            lines.push(OrderLine::snapshot(&product, request.quantity));
        }

        let order = Order::place(
            OrderId::generate(),
            cmd.user_id,
            cmd.shipping_address,
            lines,
            self.tax_rate,
        )?;

        if let Err(failed) = self.move_stock(order.lines(), StockMove::Reserve).await {
            tracing::warn!(
                product_id = %failed.product_id,
                error = %failed.source,
                "stock reservation failed after validation"
            );
            return Err(failed.source.into());
        }

        if let Err(e) = self.orders.save(order.clone()).await {
            tracing::error!(order_id = %order.id(), error = %e, "failed to store order");
            self.compensate(order.lines(), StockMove::Release).await;
            return Err(e);
        }

        Ok(order)
    }

    /// Moves an order to a new status.
    ///
    /// Cancelling returns every line's quantity to stock before the status
    /// is committed. If any line cannot be restored, the lines already
    /// restored are reserved again and the order keeps its current status.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id, to = %cmd.status))]
    pub async fn update_status(&self, cmd: UpdateOrderStatus) -> Result<Order, OrderError> {
        let UpdateOrderStatus {
            order_id,
            status: next,
        } = cmd;

        let _guard = self.transitions.lock(&order_id).await;

        let current = self.get_order(&order_id).await?;
        let from = current.status();
        if !from.can_transition_to(next) {
            tracing::debug!(%from, %next, "transition refused");
            return Err(OrderError::InvalidTransition { from, to: next });
        }

        let releases_stock = next == OrderStatus::Cancelled;
        if releases_stock {
            self.move_stock(current.lines(), StockMove::Release)
                .await
                .map_err(|failed| {
                    tracing::error!(
                        product_id = %failed.product_id,
                        error = %failed.source,
                        "stock restore failed, order not cancelled"
                    );
                    OrderError::StockRestoreFailed {
                        order_id: order_id.clone(),
                        product_id: failed.product_id,
                        source: failed.source,
                    }
                })?;
        }

        match self.orders.update_status(&order_id, from, next).await {
            Ok(order) => {
                metrics::counter!("order_status_transitions_total", "to" => next.as_str())
                    .increment(1);
                tracing::info!(%from, to = %next, "order status updated");
                Ok(order)
            }
            Err(e) => {
                if releases_stock {
                    self.compensate(current.lines(), StockMove::Reserve).await;
                }
                Err(e)
            }
        }
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.clone()))
    }

    /// Lists a user's orders, oldest first. Empty if the user has none.
    #[tracing::instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.list_by_user(user_id).await?;
        sort_oldest_first(&mut orders);
        Ok(orders)
    }

    /// Lists all orders, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.list().await?;
        sort_oldest_first(&mut orders);
        Ok(orders)
    }

    /// Applies `direction` to every line in order.
    ///
    /// On the first failure the lines already moved are moved back, so the
    /// catalog ends up as it was before the call.
    async fn move_stock(&self, lines: &[OrderLine], direction: StockMove) -> Result<(), FailedMove> {
        for (done, line) in lines.iter().enumerate() {
            let delta = direction.delta(line.quantity);
            if let Err(source) = self.catalog.adjust_stock(&line.product_id, delta).await {
                self.compensate(&lines[..done], direction.inverse()).await;
                return Err(FailedMove {
                    product_id: line.product_id.clone(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// Best-effort undo of stock moves already applied.
    ///
    /// A line that cannot be compensated is logged and counted; the rest are
    /// still attempted.
    async fn compensate(&self, lines: &[OrderLine], direction: StockMove) {
        if lines.is_empty() {
            return;
        }

        metrics::counter!("stock_rollbacks_total").increment(1);

        for line in lines {
            let delta = direction.delta(line.quantity);
            if let Err(e) = self.catalog.adjust_stock(&line.product_id, delta).await {
                metrics::counter!("stock_compensation_failures_total").increment(1);
                tracing::error!(
                    product_id = %line.product_id,
                    delta,
                    action = direction.as_str(),
                    error = %e,
                    "stock compensation failed"
                );
            }
        }

        tracing::warn!(
            lines = lines.len(),
            action = direction.as_str(),
            "compensated partial stock change"
        );
    }
}

fn sort_oldest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}
