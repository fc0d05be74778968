use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::buyer::BuyerDirectory;
use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, NewOrder, Order, OrderDetails, OrderStatus};
use crate::repository::{OrderRepository, sorted_unique_items};

/// Service layer for order business logic.
///
/// Enforces the buyer preconditions and the status state machine; the
/// repository owns the atomic placement transaction.
#[derive(Clone)]
pub struct OrderService<R: OrderRepository, B: BuyerDirectory> {
    repository: Arc<R>,
    buyers: Arc<B>,
}

impl<R: OrderRepository, B: BuyerDirectory> OrderService<R, B> {
    pub fn new(repository: R, buyers: B) -> Self {
        Self {
            repository: Arc::new(repository),
            buyers: Arc::new(buyers),
        }
    }

    /// Place an order for a buyer.
    ///
    /// Preconditions: confirmed email, and either a complete new address in
    /// the request or a complete address on file. The items must be
    /// non-empty, free of duplicate products, and within stock; the
    /// repository enforces stock atomically.
    pub async fn place_order(
        &self,
        buyer_id: Uuid,
        input: CreateOrder,
    ) -> OrderResult<OrderDetails> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        // Early duplicate check for a clean error before any I/O
        sorted_unique_items(&input.order_items)?;

        let buyer = self
            .buyers
            .buyer(buyer_id)
            .await?
            .ok_or(OrderError::BuyerNotFound(buyer_id))?;

        if !buyer.is_confirmed_email {
            return Err(OrderError::PermissionDenied(
                "Please confirm your email address".to_string(),
            ));
        }

        let address = if input.use_new_address {
            let address = input.delivery_address.ok_or_else(|| {
                OrderError::Validation(
                    "delivery_address is required when use_new_address is set".to_string(),
                )
            })?;
            if !address.is_complete() {
                return Err(OrderError::Validation(
                    "Delivery address is incomplete".to_string(),
                ));
            }
            address
        } else {
            // Snapshot the on-file profile address; later profile edits must
            // not change this order
            let address = buyer.address.ok_or_else(|| {
                OrderError::PermissionDenied(
                    "You must have a complete address to perform this action".to_string(),
                )
            })?;
            if !address.is_complete() {
                return Err(OrderError::PermissionDenied(
                    "You must have a complete address to perform this action".to_string(),
                ));
            }
            address
        };

        let details = self
            .repository
            .place(NewOrder {
                buyer_id,
                items: input.order_items,
                address,
            })
            .await?;

        tracing::info!(
            order_id = %details.order.id,
            buyer_id = %buyer_id,
            items = details.order_items.len(),
            total = %details.total_cost,
            "Order placed"
        );
        Ok(details)
    }

    /// Get an order with items and address, restricted to its owner.
    ///
    /// Unowned orders read as not-found so order IDs don't leak.
    pub async fn get_order_for_buyer(
        &self,
        id: Uuid,
        buyer_id: Uuid,
    ) -> OrderResult<OrderDetails> {
        let details = self
            .repository
            .order_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        if details.order.buyer_id != buyer_id {
            return Err(OrderError::OrderNotFound(id));
        }

        Ok(details)
    }

    /// List a buyer's orders
    pub async fn list_orders(&self, buyer_id: Uuid) -> OrderResult<Vec<Order>> {
        self.repository.list_for_buyer(buyer_id).await
    }

    /// Staff status update, enforcing the state machine.
    ///
    /// Cancellation does not restock inventory.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
        let details = self
            .repository
            .order_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        let current = details.order.status;

        if current.is_terminal() {
            return Err(OrderError::Conflict(format!(
                "Order is {}, status can't change",
                current
            )));
        }

        if !current.can_transition_to(status) {
            return Err(OrderError::Conflict(format!(
                "Illegal status transition {} -> {}",
                current, status
            )));
        }

        self.repository.update_status(id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buyer::{BuyerProfile, MockBuyerDirectory};
    use crate::models::{AddressFields, DeliveryAddress, OrderItem, OrderItemInput};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    fn address() -> AddressFields {
        AddressFields {
            city: "Berlin".to_string(),
            street_address: "Unter den Linden 1".to_string(),
            apartment_address: "Apt 4".to_string(),
            postal_code: "10117".to_string(),
        }
    }

    fn confirmed_buyer(id: Uuid) -> BuyerProfile {
        BuyerProfile {
            id,
            is_confirmed_email: true,
            address: Some(address()),
        }
    }

    /// Repository stub whose orders can be seeded directly
    #[derive(Default)]
    struct StubOrderRepository {
        orders: Mutex<HashMap<Uuid, OrderDetails>>,
    }

    impl StubOrderRepository {
        async fn seed(&self, status: OrderStatus) -> Uuid {
            let mut order = Order::new_pending(Uuid::now_v7());
            order.status = status;
            let id = order.id;
            let details = OrderDetails::new(
                order,
                vec![OrderItem::new(id, Uuid::now_v7(), 1, Decimal::new(10, 0))],
                DeliveryAddress::snapshot(id, address()),
            );
            self.orders.lock().await.insert(id, details);
            id
        }
    }

    #[async_trait]
    impl OrderRepository for StubOrderRepository {
        async fn place(&self, input: NewOrder) -> OrderResult<OrderDetails> {
            let order = Order::new_pending(input.buyer_id);
            let items = input
                .items
                .iter()
                .map(|i| OrderItem::new(order.id, i.product, i.quantity, Decimal::new(10, 0)))
                .collect();
            let address = DeliveryAddress::snapshot(order.id, input.address);
            let details = OrderDetails::new(order, items, address);
            self.orders
                .lock()
                .await
                .insert(details.order.id, details.clone());
            Ok(details)
        }

        async fn order_by_id(&self, id: Uuid) -> OrderResult<Option<OrderDetails>> {
            Ok(self.orders.lock().await.get(&id).cloned())
        }

        async fn list_for_buyer(&self, buyer_id: Uuid) -> OrderResult<Vec<Order>> {
            Ok(self
                .orders
                .lock()
                .await
                .values()
                .filter(|d| d.order.buyer_id == buyer_id)
                .map(|d| d.order.clone())
                .collect())
        }

        async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
            let mut orders = self.orders.lock().await;
            let details = orders.get_mut(&id).ok_or(OrderError::OrderNotFound(id))?;
            details.order.status = status;
            Ok(details.order.clone())
        }
    }

    fn one_item_order() -> CreateOrder {
        CreateOrder {
            order_items: vec![OrderItemInput {
                product: Uuid::now_v7(),
                quantity: 1,
            }],
            use_new_address: false,
            delivery_address: None,
        }
    }

    #[tokio::test]
    async fn test_place_order_requires_confirmed_email() {
        let buyer_id = Uuid::now_v7();
        let mut buyers = MockBuyerDirectory::new();
        buyers.expect_buyer().returning(move |id| {
            Ok(Some(BuyerProfile {
                id,
                is_confirmed_email: false,
                address: Some(address()),
            }))
        });

        let service = OrderService::new(StubOrderRepository::default(), buyers);

        let result = service.place_order(buyer_id, one_item_order()).await;
        assert!(matches!(result, Err(OrderError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_place_order_requires_address_on_file() {
        let buyer_id = Uuid::now_v7();
        let mut buyers = MockBuyerDirectory::new();
        buyers.expect_buyer().returning(move |id| {
            Ok(Some(BuyerProfile {
                id,
                is_confirmed_email: true,
                address: None,
            }))
        });

        let service = OrderService::new(StubOrderRepository::default(), buyers);

        let result = service.place_order(buyer_id, one_item_order()).await;
        assert!(matches!(result, Err(OrderError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_place_order_with_new_address_requires_fields() {
        let buyer_id = Uuid::now_v7();
        let mut buyers = MockBuyerDirectory::new();
        buyers
            .expect_buyer()
            .returning(move |id| Ok(Some(confirmed_buyer(id))));

        let service = OrderService::new(StubOrderRepository::default(), buyers);

        let mut input = one_item_order();
        input.use_new_address = true;
        // Missing delivery_address
        let result = service.place_order(buyer_id, input).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_place_order_snapshots_on_file_address() {
        let buyer_id = Uuid::now_v7();
        let mut buyers = MockBuyerDirectory::new();
        buyers
            .expect_buyer()
            .returning(move |id| Ok(Some(confirmed_buyer(id))));

        let service = OrderService::new(StubOrderRepository::default(), buyers);

        let details = service
            .place_order(buyer_id, one_item_order())
            .await
            .unwrap();
        assert_eq!(details.delivery_address.city, "Berlin");
    }

    #[tokio::test]
    async fn test_place_order_rejects_duplicate_products() {
        let buyer_id = Uuid::now_v7();
        let product = Uuid::now_v7();
        let mut buyers = MockBuyerDirectory::new();
        buyers
            .expect_buyer()
            .returning(move |id| Ok(Some(confirmed_buyer(id))));

        let service = OrderService::new(StubOrderRepository::default(), buyers);

        let input = CreateOrder {
            order_items: vec![
                OrderItemInput {
                    product,
                    quantity: 1,
                },
                OrderItemInput {
                    product,
                    quantity: 2,
                },
            ],
            use_new_address: false,
            delivery_address: None,
        };

        let result = service.place_order(buyer_id, input).await;
        assert!(matches!(result, Err(OrderError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_order_hides_foreign_orders() {
        let buyers = MockBuyerDirectory::new();
        let repo = StubOrderRepository::default();
        let order_id = repo.seed(OrderStatus::Pending).await;
        let service = OrderService::new(repo, buyers);

        let result = service
            .get_order_for_buyer(order_id, Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_status_happy_path() {
        let buyers = MockBuyerDirectory::new();
        let repo = StubOrderRepository::default();
        let order_id = repo.seed(OrderStatus::Pending).await;
        let service = OrderService::new(repo, buyers);

        let shipped = service
            .update_status(order_id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        let delivered = service
            .update_status(order_id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_status_from_terminal_conflicts() {
        let buyers = MockBuyerDirectory::new();
        let repo = StubOrderRepository::default();
        let cancelled = repo.seed(OrderStatus::Cancelled).await;
        let delivered = repo.seed(OrderStatus::Delivered).await;
        let service = OrderService::new(repo, buyers);

        for (id, _) in [(cancelled, "cancelled"), (delivered, "delivered")] {
            let result = service.update_status(id, OrderStatus::Shipped).await;
            assert!(matches!(result, Err(OrderError::Conflict(_))));
        }
    }

    #[tokio::test]
    async fn test_update_status_rejects_backward_transition() {
        let buyers = MockBuyerDirectory::new();
        let repo = StubOrderRepository::default();
        let order_id = repo.seed(OrderStatus::Shipped).await;
        let service = OrderService::new(repo, buyers);

        let result = service.update_status(order_id, OrderStatus::Pending).await;
        assert!(matches!(result, Err(OrderError::Conflict(_))));
    }
}
