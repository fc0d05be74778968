use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categories::Id))
                    .col(string(Categories::Name))
                    .col(boolean(Categories::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Categories::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_name")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create sub_categories table
        manager
            .create_table(
                Table::create()
                    .table(SubCategories::Table)
                    .if_not_exists()
                    .col(pk_uuid(SubCategories::Id))
                    .col(uuid(SubCategories::CategoryId))
                    .col(string(SubCategories::Name))
                    .col(boolean(SubCategories::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(SubCategories::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_categories_category")
                            .from(SubCategories::Table, SubCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sub_categories_name")
                    .table(SubCategories::Table)
                    .col(SubCategories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sub_categories_category_id")
                    .table(SubCategories::Table)
                    .col(SubCategories::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(uuid(Products::SubCategoryId))
                    .col(string_len(Products::Name, 155))
                    .col(string_len(Products::Brand, 155))
                    .col(text(Products::Description))
                    .col(
                        decimal_len(Products::Price, 12, 2)
                            .check(Expr::col(Products::Price).gte(0)),
                    )
                    .col(
                        integer(Products::Quantity)
                            .check(Expr::col(Products::Quantity).gte(0)),
                    )
                    .col(boolean(Products::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Products::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_sub_category")
                            .from(Products::Table, Products::SubCategoryId)
                            .to(SubCategories::Table, SubCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_sub_category_id")
                    .table(Products::Table)
                    .col(Products::SubCategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_is_active")
                    .table(Products::Table)
                    .col(Products::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Add updated_at trigger
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER products_touch_updated_at
                    BEFORE UPDATE ON products
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SubCategories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SubCategories {
    Table,
    Id,
    CategoryId,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    SubCategoryId,
    Name,
    Brand,
    Description,
    Price,
    Quantity,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
