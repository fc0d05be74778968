//! SeaORM entities for the catalog tables.

/// `categories` table
pub mod category {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
        pub is_active: bool,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::subcategory::Entity")]
        SubCategory,
    }

    impl Related<super::subcategory::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::SubCategory.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Category {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                is_active: model.is_active,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::CreateCategory> for ActiveModel {
        fn from(input: crate::models::CreateCategory) -> Self {
            ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(input.name),
                is_active: Set(true),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}

/// `sub_categories` table
pub mod subcategory {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "sub_categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub category_id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
        pub is_active: bool,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::category::Entity",
            from = "Column::CategoryId",
            to = "super::category::Column::Id"
        )]
        Category,
        #[sea_orm(has_many = "super::product::Entity")]
        Product,
    }

    impl Related<super::category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl Related<super::product::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::SubCategory {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                category_id: model.category_id,
                name: model.name,
                is_active: model.is_active,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::CreateSubCategory> for ActiveModel {
        fn from(input: crate::models::CreateSubCategory) -> Self {
            ActiveModel {
                id: Set(Uuid::now_v7()),
                category_id: Set(input.category_id),
                name: Set(input.name),
                is_active: Set(true),
                created_at: Set(chrono::Utc::now().into()),
            }
        }
    }
}

/// `products` table
pub mod product {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub sub_category_id: Uuid,
        pub name: String,
        pub brand: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub price: Decimal,
        pub quantity: i32,
        pub is_active: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
        pub deleted_at: Option<DateTimeWithTimeZone>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::subcategory::Entity",
            from = "Column::SubCategoryId",
            to = "super::subcategory::Column::Id"
        )]
        SubCategory,
    }

    impl Related<super::subcategory::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::SubCategory.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                sub_category_id: model.sub_category_id,
                name: model.name,
                brand: model.brand,
                description: model.description,
                price: model.price,
                quantity: model.quantity,
                is_active: model.is_active,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
                deleted_at: model.deleted_at.map(Into::into),
            }
        }
    }

    impl From<crate::models::CreateProduct> for ActiveModel {
        fn from(input: crate::models::CreateProduct) -> Self {
            let now = chrono::Utc::now();
            ActiveModel {
                id: Set(Uuid::now_v7()),
                sub_category_id: Set(input.sub_category_id),
                name: Set(input.name),
                brand: Set(input.brand),
                description: Set(input.description),
                price: Set(input.price),
                quantity: Set(input.quantity),
                is_active: Set(true),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                deleted_at: Set(None),
            }
        }
    }
}
