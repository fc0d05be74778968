use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create order_status enum
        manager
            .create_type(
                Type::create()
                    .as_enum(OrderStatus::Enum)
                    .values([
                        OrderStatus::Pending,
                        OrderStatus::Shipped,
                        OrderStatus::Delivered,
                        OrderStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        // Create orders table
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_uuid(Orders::Id))
                    .col(uuid(Orders::BuyerId))
                    .col(
                        ColumnDef::new(Orders::Status)
                            .enumeration(
                                OrderStatus::Enum,
                                [
                                    OrderStatus::Pending,
                                    OrderStatus::Shipped,
                                    OrderStatus::Delivered,
                                    OrderStatus::Cancelled,
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        timestamp_with_time_zone(Orders::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Orders::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_buyer")
                            .from(Orders::Table, Orders::BuyerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_buyer_id")
                    .table(Orders::Table)
                    .col(Orders::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_created_at")
                    .table(Orders::Table)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create order_items table
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(pk_uuid(OrderItems::Id))
                    .col(uuid(OrderItems::OrderId))
                    .col(uuid(OrderItems::ProductId))
                    .col(
                        integer(OrderItems::Quantity)
                            .check(Expr::col(OrderItems::Quantity).gt(0)),
                    )
                    .col(decimal_len(OrderItems::UnitPrice, 12, 2))
                    .col(
                        timestamp_with_time_zone(OrderItems::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(OrderItems::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_product")
                            .from(OrderItems::Table, OrderItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One line per product per order
        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order_product")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .col(OrderItems::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create delivery_addresses table (one per order, snapshot data)
        manager
            .create_table(
                Table::create()
                    .table(DeliveryAddresses::Table)
                    .if_not_exists()
                    .col(pk_uuid(DeliveryAddresses::Id))
                    .col(uuid(DeliveryAddresses::OrderId))
                    .col(string(DeliveryAddresses::City))
                    .col(string(DeliveryAddresses::StreetAddress))
                    .col(string(DeliveryAddresses::ApartmentAddress))
                    .col(string(DeliveryAddresses::PostalCode).default(""))
                    .col(
                        timestamp_with_time_zone(DeliveryAddresses::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(DeliveryAddresses::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_addresses_order")
                            .from(DeliveryAddresses::Table, DeliveryAddresses::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_addresses_order_id")
                    .table(DeliveryAddresses::Table)
                    .col(DeliveryAddresses::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Add updated_at triggers
        for table in ["orders", "order_items", "delivery_addresses"] {
            manager
                .get_connection()
                .execute_unprepared(&format!(
                    r#"
                    CREATE TRIGGER {table}_touch_updated_at
                        BEFORE UPDATE ON {table}
                        FOR EACH ROW
                        EXECUTE FUNCTION util.touch_updated_at()
                    "#,
                ))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryAddresses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(OrderStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    BuyerId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    Quantity,
    UnitPrice,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DeliveryAddresses {
    Table,
    Id,
    OrderId,
    City,
    StreetAddress,
    ApartmentAddress,
    PostalCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderStatus {
    #[sea_orm(iden = "order_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "shipped")]
    Shipped,
    #[sea_orm(iden = "delivered")]
    Delivered,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
