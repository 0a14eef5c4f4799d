use async_trait::async_trait;
use common::{OrderId, UserId};
use storage::{InMemoryStore, KeyValueStore};

use super::{Order, OrderError, OrderStatus};

/// Persistence boundary for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Saves a new order. Fails with `AlreadyExists` if the id is taken.
    async fn save(&self, order: Order) -> Result<(), OrderError>;

    /// Retrieves an order. Returns None if it doesn't exist.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>, OrderError>;

    /// Moves an order from `expected` to `next` in one atomic step.
    ///
    /// Fails with `ConcurrentModification` if the stored status is no longer
    /// `expected`, and with `InvalidTransition` if the state machine forbids
    /// the move.
    async fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, OrderError>;

    /// Returns every order placed by `user_id`, in no particular order.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError>;

    /// Returns all orders, in no particular order.
    async fn list(&self) -> Result<Vec<Order>, OrderError>;
}

/// In-memory order store.
///
/// The by-user lookup is a scan over all orders.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    orders: InMemoryStore<OrderId, Order>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self {
            orders: InMemoryStore::new("order"),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: Order) -> Result<(), OrderError> {
        Ok(self.orders.insert(order.id().clone(), order).await?)
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.orders.get(id).await?)
    }

    async fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, OrderError> {
        self.orders
            .update(id, |current| {
                if current.status() != expected {
                    return Err(OrderError::ConcurrentModification {
                        order_id: id.clone(),
                        expected,
                        actual: current.status(),
                    });
                }
                if !current.status().can_transition_to(next) {
                    return Err(OrderError::InvalidTransition {
                        from: current.status(),
                        to: next,
                    });
                }
                Ok(current.with_status(next))
            })
            .await
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.scan(|order| order.user_id() == user_id).await?)
    }

    async fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.values().await?)
    }
}
