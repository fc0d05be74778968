use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
};
use uuid::Uuid;

use crate::{
    entity::{customer, customer_address},
    error::{CustomerError, CustomerResult},
    models::{Address, Customer, CustomerAddress},
    repository::CustomerRepository,
};

fn db_err(e: sea_orm::DbErr) -> CustomerError {
    CustomerError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of CustomerRepository
#[derive(Clone)]
pub struct PgCustomerRepository {
    base: BaseRepository<customer::Entity>,
}

impl PgCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, input: Customer) -> CustomerResult<Customer> {
        let exists = self.get_by_email(&input.email).await?.is_some();
        if exists {
            return Err(CustomerError::DuplicateEmail(input.email));
        }

        let active_model: customer::ActiveModel = input.into();
        let model = self.base.insert(active_model).await.map_err(db_err)?;

        tracing::info!(customer_id = %model.id, "Created customer");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>> {
        let model = self.base.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn get_by_email(&self, email: &str) -> CustomerResult<Option<Customer>> {
        let model = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(self.base.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn update(&self, input: Customer) -> CustomerResult<Customer> {
        let id = input.id;
        self.base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CustomerError::NotFound(id))?;

        let active_model: customer::ActiveModel = input.into();
        let updated = self.base.update(active_model).await.map_err(db_err)?;

        tracing::info!(customer_id = %id, "Updated customer");
        Ok(updated.into())
    }

    async fn address_for(&self, customer_id: Uuid) -> CustomerResult<Option<CustomerAddress>> {
        let model = customer_address::Entity::find()
            .filter(customer_address::Column::CustomerId.eq(customer_id))
            .one(self.base.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn upsert_address(
        &self,
        customer_id: Uuid,
        address: Address,
    ) -> CustomerResult<CustomerAddress> {
        let customer_exists = self
            .base
            .find_by_id(customer_id)
            .await
            .map_err(db_err)?
            .is_some();
        if !customer_exists {
            return Err(CustomerError::NotFound(customer_id));
        }

        let existing = customer_address::Entity::find()
            .filter(customer_address::Column::CustomerId.eq(customer_id))
            .one(self.base.db())
            .await
            .map_err(db_err)?;

        let model = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.city = Set(address.city);
                active.street_address = Set(address.street_address);
                active.apartment_address = Set(address.apartment_address);
                active.postal_code = Set(address.postal_code);
                active.updated_at = Set(Utc::now().into());
                active.update(self.base.db()).await.map_err(db_err)?
            }
            None => {
                let active = customer_address::ActiveModel::for_customer(customer_id, address);
                active.insert(self.base.db()).await.map_err(db_err)?
            }
        };

        tracing::info!(customer_id = %customer_id, "Upserted customer address");
        Ok(model.into())
    }
}
