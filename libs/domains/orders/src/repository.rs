use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain_catalog::{ProductRepository, UpdateProduct};

use crate::error::{OrderError, OrderResult};
use crate::models::{
    DeliveryAddress, NewOrder, Order, OrderDetails, OrderItem, OrderItemInput, OrderStatus,
};

/// Repository trait for Order persistence.
///
/// `place` is the order placement transaction: order, items and address
/// snapshot are created while product stock is decremented, all-or-nothing.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Place a validated order. Atomic: on any failure nothing persists and
    /// no stock is decremented.
    async fn place(&self, input: NewOrder) -> OrderResult<OrderDetails>;

    /// Get an order with items and address
    async fn order_by_id(&self, id: Uuid) -> OrderResult<Option<OrderDetails>>;

    /// List a buyer's orders, newest first
    async fn list_for_buyer(&self, buyer_id: Uuid) -> OrderResult<Vec<Order>>;

    /// Single-field status update (last-write-wins)
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order>;
}

/// Reject duplicate product lines; returns items sorted by product ID.
///
/// The stable ordering also fixes the row-lock order in the PostgreSQL
/// implementation so concurrent orders can't deadlock.
pub(crate) fn sorted_unique_items(items: &[OrderItemInput]) -> OrderResult<Vec<OrderItemInput>> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.product.cmp(&b.product));

    for pair in sorted.windows(2) {
        if pair[0].product == pair[1].product {
            return Err(OrderError::Conflict(
                "Product already exists in your order".to_string(),
            ));
        }
    }

    Ok(sorted)
}

#[derive(Debug, Default)]
struct OrderState {
    orders: HashMap<Uuid, Order>,
    items: HashMap<Uuid, Vec<OrderItem>>,            // keyed by order_id
    addresses: HashMap<Uuid, DeliveryAddress>,       // keyed by order_id
}

/// In-memory implementation of OrderRepository (for development/testing).
///
/// Stock lives in the injected [`ProductRepository`]. Placement validates
/// every line before writing anything, so a failed line leaves no partial
/// order and no decremented stock. Cross-request row locking is the
/// PostgreSQL implementation's job.
#[derive(Clone)]
pub struct InMemoryOrderRepository<P: ProductRepository> {
    products: Arc<P>,
    state: Arc<RwLock<OrderState>>,
}

impl<P: ProductRepository> InMemoryOrderRepository<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self {
            products,
            state: Arc::new(RwLock::new(OrderState::default())),
        }
    }
}

fn catalog_err(e: domain_catalog::CatalogError) -> OrderError {
    OrderError::Internal(e.to_string())
}

#[async_trait]
impl<P: ProductRepository> OrderRepository for InMemoryOrderRepository<P> {
    async fn place(&self, input: NewOrder) -> OrderResult<OrderDetails> {
        let items = sorted_unique_items(&input.items)?;

        // Validate every line against current stock before touching anything
        let mut resolved = Vec::with_capacity(items.len());
        for item in &items {
            let product = self
                .products
                .product_by_id(item.product)
                .await
                .map_err(catalog_err)?
                .ok_or(OrderError::ProductNotFound(item.product))?;

            if !product.is_active {
                return Err(OrderError::Validation(format!(
                    "Product '{}' is not available",
                    product.name
                )));
            }

            if item.quantity > product.quantity {
                return Err(OrderError::Validation(format!(
                    "Ordered quantity exceeds stock for product '{}'",
                    product.name
                )));
            }

            resolved.push((item.clone(), product));
        }

        // All lines check out - decrement stock and persist the order
        for (item, product) in &resolved {
            self.products
                .update_product(
                    product.id,
                    UpdateProduct {
                        quantity: Some(product.quantity - item.quantity),
                        ..Default::default()
                    },
                )
                .await
                .map_err(catalog_err)?;
        }

        let order = Order::new_pending(input.buyer_id);
        let order_items: Vec<OrderItem> = resolved
            .iter()
            .map(|(item, product)| {
                OrderItem::new(order.id, product.id, item.quantity, product.price)
            })
            .collect();
        let address = DeliveryAddress::snapshot(order.id, input.address);

        let mut state = self.state.write().await;
        state.orders.insert(order.id, order.clone());
        state.items.insert(order.id, order_items.clone());
        state.addresses.insert(order.id, address.clone());

        tracing::info!(order_id = %order.id, buyer_id = %order.buyer_id, "Placed order");
        Ok(OrderDetails::new(order, order_items, address))
    }

    async fn order_by_id(&self, id: Uuid) -> OrderResult<Option<OrderDetails>> {
        let state = self.state.read().await;

        let Some(order) = state.orders.get(&id) else {
            return Ok(None);
        };
        let items = state.items.get(&id).cloned().unwrap_or_default();
        let address = state
            .addresses
            .get(&id)
            .cloned()
            .ok_or_else(|| OrderError::Internal(format!("Order {} has no address", id)))?;

        Ok(Some(OrderDetails::new(order.clone(), items, address)))
    }

    async fn list_for_buyer(&self, buyer_id: Uuid) -> OrderResult<Vec<Order>> {
        let state = self.state.read().await;

        let mut result: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
        let mut state = self.state.write().await;

        let order = state
            .orders
            .get_mut(&id)
            .ok_or(OrderError::OrderNotFound(id))?;
        order.status = status;
        order.updated_at = chrono::Utc::now();
        let updated = order.clone();

        tracing::info!(order_id = %id, status = %status, "Updated order status");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_catalog::{
        CreateCategory, CreateProduct, CreateSubCategory, InMemoryCatalogRepository, Product,
        CategoryRepository, SubCategoryRepository,
    };
    use rust_decimal::Decimal;

    fn address() -> crate::models::AddressFields {
        crate::models::AddressFields {
            city: "Berlin".to_string(),
            street_address: "Unter den Linden 1".to_string(),
            apartment_address: "Apt 4".to_string(),
            postal_code: "10117".to_string(),
        }
    }

    async fn seed_product(
        catalog: &InMemoryCatalogRepository,
        name: &str,
        quantity: i32,
        price: i64,
    ) -> Product {
        let category = catalog
            .create_category(CreateCategory {
                name: format!("Category for {}", name),
            })
            .await
            .unwrap();

        let sub = catalog
            .create_subcategory(CreateSubCategory {
                category_id: category.id,
                name: format!("Subcategory for {}", name),
            })
            .await
            .unwrap();

        catalog
            .create_product(CreateProduct {
                sub_category_id: sub.id,
                name: name.to_string(),
                brand: "Acme".to_string(),
                description: String::new(),
                price: Decimal::new(price, 0),
                quantity,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_place_decrements_stock_and_totals() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 100, 500).await;

        let details = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![OrderItemInput {
                    product: product.id,
                    quantity: 10,
                }],
                address: address(),
            })
            .await
            .unwrap();

        assert_eq!(details.order.status, OrderStatus::Pending);
        assert_eq!(details.total_cost, Decimal::new(5000, 0));
        assert_eq!(details.order_items[0].unit_price, Decimal::new(500, 0));

        let product = catalog.product_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 90);
    }

    #[tokio::test]
    async fn test_place_rejects_insufficient_stock() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 90, 500).await;

        let result = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![OrderItemInput {
                    product: product.id,
                    quantity: 200,
                }],
                address: address(),
            })
            .await;

        assert!(matches!(result, Err(OrderError::Validation(_))));

        // Stock untouched
        let product = catalog.product_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 90);
    }

    #[tokio::test]
    async fn test_failing_line_leaves_no_partial_order() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let first = seed_product(&catalog, "Phone X", 100, 500).await;
        let second = seed_product(&catalog, "Tablet Z", 3, 300).await;
        let buyer_id = Uuid::now_v7();

        let result = repo
            .place(NewOrder {
                buyer_id,
                items: vec![
                    OrderItemInput {
                        product: first.id,
                        quantity: 10,
                    },
                    OrderItemInput {
                        product: second.id,
                        quantity: 5, // exceeds stock of 3
                    },
                ],
                address: address(),
            })
            .await;

        assert!(result.is_err());

        // Neither product was decremented, no order persisted
        let first = catalog.product_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(first.quantity, 100);
        let second = catalog.product_by_id(second.id).await.unwrap().unwrap();
        assert_eq!(second.quantity, 3);
        assert!(repo.list_for_buyer(buyer_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_rejects_duplicate_product_lines() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 100, 500).await;

        let result = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![
                    OrderItemInput {
                        product: product.id,
                        quantity: 1,
                    },
                    OrderItemInput {
                        product: product.id,
                        quantity: 2,
                    },
                ],
                address: address(),
            })
            .await;

        assert!(matches!(result, Err(OrderError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_place_rejects_inactive_product() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 100, 500).await;
        catalog.set_product_active(product.id, false).await.unwrap();

        let result = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![OrderItemInput {
                    product: product.id,
                    quantity: 1,
                }],
                address: address(),
            })
            .await;

        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unit_price_is_a_snapshot() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 100, 500).await;

        let details = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![OrderItemInput {
                    product: product.id,
                    quantity: 1,
                }],
                address: address(),
            })
            .await
            .unwrap();

        // A later price change must not affect the placed order
        catalog
            .update_product(
                product.id,
                UpdateProduct {
                    price: Some(Decimal::new(999, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let fetched = repo
            .order_by_id(details.order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.order_items[0].unit_price, Decimal::new(500, 0));
        assert_eq!(fetched.total_cost, Decimal::new(500, 0));
    }

    #[tokio::test]
    async fn test_update_status_is_single_field() {
        let catalog = Arc::new(InMemoryCatalogRepository::new());
        let repo = InMemoryOrderRepository::new(catalog.clone());

        let product = seed_product(&catalog, "Phone X", 100, 500).await;

        let details = repo
            .place(NewOrder {
                buyer_id: Uuid::now_v7(),
                items: vec![OrderItemInput {
                    product: product.id,
                    quantity: 10,
                }],
                address: address(),
            })
            .await
            .unwrap();

        let updated = repo
            .update_status(details.order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        // Cancellation does not restock (deliberate no-op)
        repo.update_status(details.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        let product = catalog.product_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 90);
    }
}
