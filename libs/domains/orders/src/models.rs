use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle status.
///
/// `pending → shipped → delivered`, with cancellation possible from
/// `pending` and `shipped`. `delivered` and `cancelled` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Legal transitions move forward only.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::Pending,
                OrderStatus::Shipped | OrderStatus::Delivered | OrderStatus::Cancelled
            ) | (
                OrderStatus::Shipped,
                OrderStatus::Delivered | OrderStatus::Cancelled
            )
        )
    }
}

/// Order row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line of an order.
///
/// `unit_price` is a snapshot of the product price at placement time, so
/// later catalog edits don't change past orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Derived: quantity * unit_price
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plain address fields, snapshotted onto every order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddressFields {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub street_address: String,
    #[validate(length(min = 1, max = 100))]
    pub apartment_address: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
}

impl AddressFields {
    pub fn is_complete(&self) -> bool {
        !self.city.is_empty()
            && !self.street_address.is_empty()
            && !self.apartment_address.is_empty()
            && !self.postal_code.is_empty()
    }
}

/// Persisted delivery address (exactly one per order)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    pub id: Uuid,
    pub order_id: Uuid,
    pub city: String,
    pub street_address: String,
    pub apartment_address: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One requested line in a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    /// Product ID
    pub product: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// DTO for placing an order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub order_items: Vec<OrderItemInput>,
    /// When true, `delivery_address` is used; otherwise the buyer's on-file
    /// address is snapshotted
    #[serde(default)]
    pub use_new_address: bool,
    #[validate(nested)]
    pub delivery_address: Option<AddressFields>,
}

/// DTO for a staff status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

/// Fully validated placement input handed to the repository.
///
/// The address is already resolved (new vs. on-file) by the service.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: Uuid,
    pub items: Vec<OrderItemInput>,
    pub address: AddressFields,
}

/// An order with its line items and delivery address
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
    pub delivery_address: DeliveryAddress,
    /// Derived: sum of line item costs
    pub total_cost: Decimal,
}

impl OrderDetails {
    pub fn new(order: Order, order_items: Vec<OrderItem>, delivery_address: DeliveryAddress) -> Self {
        let total_cost = order_items.iter().map(|item| item.cost).sum();
        Self {
            order,
            order_items,
            delivery_address,
            total_cost,
        }
    }
}

impl Order {
    pub fn new_pending(buyer_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            buyer_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl OrderItem {
    pub fn new(order_id: Uuid, product_id: Uuid, quantity: i32, unit_price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            order_id,
            product_id,
            quantity,
            unit_price,
            cost: unit_price * Decimal::from(quantity),
            created_at: now,
            updated_at: now,
        }
    }
}

impl DeliveryAddress {
    pub fn snapshot(order_id: Uuid, address: AddressFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            order_id,
            city: address.city,
            street_address: address.street_address,
            apartment_address: address.apartment_address,
            postal_code: address.postal_code,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_admits_all_forward_transitions() {
        let pending = OrderStatus::Pending;
        assert!(pending.can_transition_to(OrderStatus::Shipped));
        assert!(pending.can_transition_to(OrderStatus::Delivered));
        assert!(pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_shipped_cannot_go_backward() {
        let shipped = OrderStatus::Shipped;
        assert!(shipped.can_transition_to(OrderStatus::Delivered));
        assert!(shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!shipped.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_terminal_statuses_admit_nothing() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                OrderStatus::Pending,
                OrderStatus::Shipped,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_item_cost_is_quantity_times_unit_price() {
        let item = OrderItem::new(Uuid::now_v7(), Uuid::now_v7(), 10, Decimal::new(500, 0));
        assert_eq!(item.cost, Decimal::new(5000, 0));
    }

    #[test]
    fn test_order_details_totals_line_costs() {
        let order = Order::new_pending(Uuid::now_v7());
        let items = vec![
            OrderItem::new(order.id, Uuid::now_v7(), 2, Decimal::new(100, 0)),
            OrderItem::new(order.id, Uuid::now_v7(), 1, Decimal::new(50, 0)),
        ];
        let address = DeliveryAddress::snapshot(
            order.id,
            AddressFields {
                city: "Berlin".to_string(),
                street_address: "Unter den Linden 1".to_string(),
                apartment_address: "Apt 4".to_string(),
                postal_code: "10117".to_string(),
            },
        );

        let details = OrderDetails::new(order, items, address);
        assert_eq!(details.total_cost, Decimal::new(250, 0));
    }

    #[test]
    fn test_create_order_rejects_empty_items() {
        let input = CreateOrder {
            order_items: vec![],
            use_new_address: false,
            delivery_address: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_order_rejects_zero_quantity() {
        let input = CreateOrder {
            order_items: vec![OrderItemInput {
                product: Uuid::now_v7(),
                quantity: 0,
            }],
            use_new_address: false,
            delivery_address: None,
        };
        assert!(input.validate().is_err());
    }
}
