use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Customers::Id))
                    .col(string(Customers::Email))
                    .col(string(Customers::FirstName).default(""))
                    .col(string(Customers::LastName).default(""))
                    .col(string(Customers::PasswordHash))
                    .col(boolean(Customers::IsStaff).default(false))
                    .col(boolean(Customers::IsActive).default(true))
                    .col(boolean(Customers::IsConfirmedEmail).default(false))
                    .col(
                        timestamp_with_time_zone(Customers::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Customers::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_email")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create customer_addresses table (one per customer)
        manager
            .create_table(
                Table::create()
                    .table(CustomerAddresses::Table)
                    .if_not_exists()
                    .col(pk_uuid(CustomerAddresses::Id))
                    .col(uuid(CustomerAddresses::CustomerId))
                    .col(string(CustomerAddresses::City))
                    .col(string(CustomerAddresses::StreetAddress))
                    .col(string(CustomerAddresses::ApartmentAddress))
                    .col(string(CustomerAddresses::PostalCode).default(""))
                    .col(
                        timestamp_with_time_zone(CustomerAddresses::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(CustomerAddresses::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_addresses_customer")
                            .from(CustomerAddresses::Table, CustomerAddresses::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customer_addresses_customer_id")
                    .table(CustomerAddresses::Table)
                    .col(CustomerAddresses::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Add updated_at triggers
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER customers_touch_updated_at
                    BEFORE UPDATE ON customers
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER customer_addresses_touch_updated_at
                    BEFORE UPDATE ON customer_addresses
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerAddresses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    IsStaff,
    IsActive,
    IsConfirmedEmail,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CustomerAddresses {
    Table,
    Id,
    CustomerId,
    City,
    StreetAddress,
    ApartmentAddress,
    PostalCode,
    CreatedAt,
    UpdatedAt,
}
