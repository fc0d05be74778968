//! SeaORM entities for the customer tables.

/// `customers` table
pub mod customer {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "customers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub password_hash: String,
        pub is_staff: bool,
        pub is_active: bool,
        pub is_confirmed_email: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_one = "super::customer_address::Entity")]
        Address,
    }

    impl Related<super::customer_address::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Address.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Customer {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                email: model.email,
                first_name: model.first_name,
                last_name: model.last_name,
                password_hash: model.password_hash,
                is_staff: model.is_staff,
                is_active: model.is_active,
                is_confirmed_email: model.is_confirmed_email,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::Customer> for ActiveModel {
        fn from(customer: crate::models::Customer) -> Self {
            ActiveModel {
                id: Set(customer.id),
                email: Set(customer.email),
                first_name: Set(customer.first_name),
                last_name: Set(customer.last_name),
                password_hash: Set(customer.password_hash),
                is_staff: Set(customer.is_staff),
                is_active: Set(customer.is_active),
                is_confirmed_email: Set(customer.is_confirmed_email),
                created_at: Set(customer.created_at.into()),
                updated_at: Set(customer.updated_at.into()),
            }
        }
    }
}

/// `customer_addresses` table
pub mod customer_address {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "customer_addresses")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub customer_id: Uuid,
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
            belongs_to = "super::customer::Entity",
            from = "Column::CustomerId",
            to = "super::customer::Column::Id"
        )]
        Customer,
    }

    impl Related<super::customer::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Customer.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::CustomerAddress {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                customer_id: model.customer_id,
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
        /// Build a fresh row for a customer from plain address fields.
        pub fn for_customer(customer_id: Uuid, address: crate::models::Address) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                customer_id: Set(customer_id),
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
