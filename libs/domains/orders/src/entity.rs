//! SeaORM entities for the order tables.

/// `orders` table
pub mod order {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    use crate::models::OrderStatus;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "orders")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub buyer_id: Uuid,
        pub status: OrderStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::order_item::Entity")]
        OrderItem,
        #[sea_orm(has_one = "super::delivery_address::Entity")]
        DeliveryAddress,
    }

    impl Related<super::order_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::OrderItem.def()
        }
    }

    impl Related<super::delivery_address::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::DeliveryAddress.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Order {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                buyer_id: model.buyer_id,
                status: model.status,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl ActiveModel {
        /// A fresh pending order for a buyer.
        pub fn new_pending(buyer_id: Uuid) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                buyer_id: Set(buyer_id),
                status: Set(OrderStatus::Pending),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

/// `order_items` table
pub mod order_item {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "order_items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub order_id: Uuid,
        pub product_id: Uuid,
        pub quantity: i32,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub unit_price: Decimal,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::order::Entity",
            from = "Column::OrderId",
            to = "super::order::Column::Id"
        )]
        Order,
    }

    impl Related<super::order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Order.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::OrderItem {
        fn from(model: Model) -> Self {
            crate::models::OrderItem {
                id: model.id,
                order_id: model.order_id,
                product_id: model.product_id,
                quantity: model.quantity,
                unit_price: model.unit_price,
                cost: model.unit_price * Decimal::from(model.quantity),
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl ActiveModel {
        pub fn for_order(
            order_id: Uuid,
            product_id: Uuid,
            quantity: i32,
            unit_price: Decimal,
        ) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order_id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                unit_price: Set(unit_price),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

/// `delivery_addresses` table
pub mod delivery_address {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    use crate::models::AddressFields;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "delivery_addresses")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub order_id: Uuid,
        pub city: String,
        pub street_address: String,
        pub apartment_address: String,
        pub postal_code: String,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::order::Entity",
            from = "Column::OrderId",
            to = "super::order::Column::Id"
        )]
        Order,
    }

    impl Related<super::order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Order.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::DeliveryAddress {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                order_id: model.order_id,
                city: model.city,
                street_address: model.street_address,
                apartment_address: model.apartment_address,
                postal_code: model.postal_code,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl ActiveModel {
        /// Snapshot plain address fields onto an order.
        pub fn for_order(order_id: Uuid, address: AddressFields) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order_id),
                city: Set(address.city),
                street_address: Set(address.street_address),
                apartment_address: Set(address.apartment_address),
                postal_code: Set(address.postal_code),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}
