pub use sea_orm_migration::prelude::*;

mod m20260115_000000_bootstrap;
mod m20260115_000001_create_customers;
mod m20260115_000002_create_catalog;
mod m20260115_000003_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000000_bootstrap::Migration),
            Box::new(m20260115_000001_create_customers::Migration),
            Box::new(m20260115_000002_create_catalog::Migration),
            Box::new(m20260115_000003_create_orders::Migration),
        ]
    }
}
