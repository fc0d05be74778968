//! Orders domain: order placement, inventory reservation, status machine.
//!
//! The placement path is the transactional heart of the system: an order,
//! its line items and a delivery-address snapshot are created while product
//! stock is decremented, all-or-nothing.

pub mod buyer;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use buyer::{BuyerDirectory, BuyerProfile};
pub use error::{OrderError, OrderResult};
pub use models::{
    AddressFields, CreateOrder, DeliveryAddress, NewOrder, Order, OrderDetails, OrderItem,
    OrderItemInput, OrderStatus, UpdateOrderStatus,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
