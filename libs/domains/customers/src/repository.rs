use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{Address, Customer, CustomerAddress};

/// Repository trait for Customer persistence
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Create a new customer (email must be unique)
    async fn create(&self, customer: Customer) -> CustomerResult<Customer>;

    /// Get a customer by ID
    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>>;

    /// Get a customer by email
    async fn get_by_email(&self, email: &str) -> CustomerResult<Option<Customer>>;

    /// Update an existing customer
    async fn update(&self, customer: Customer) -> CustomerResult<Customer>;

    /// Get the profile address of a customer, if one is on file
    async fn address_for(&self, customer_id: Uuid) -> CustomerResult<Option<CustomerAddress>>;

    /// Create or replace the profile address of a customer
    async fn upsert_address(
        &self,
        customer_id: Uuid,
        address: Address,
    ) -> CustomerResult<CustomerAddress>;
}

#[derive(Debug, Default)]
struct CustomerState {
    customers: HashMap<Uuid, Customer>,
    addresses: HashMap<Uuid, CustomerAddress>, // keyed by customer_id
}

/// In-memory implementation of CustomerRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomerRepository {
    state: Arc<RwLock<CustomerState>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CustomerState::default())),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: Customer) -> CustomerResult<Customer> {
        let mut state = self.state.write().await;

        let email_exists = state
            .customers
            .values()
            .any(|c| c.email.to_lowercase() == customer.email.to_lowercase());

        if email_exists {
            return Err(CustomerError::DuplicateEmail(customer.email));
        }

        state.customers.insert(customer.id, customer.clone());

        tracing::info!(customer_id = %customer.id, "Created customer");
        Ok(customer)
    }

    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> CustomerResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state
            .customers
            .values()
            .find(|c| c.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }

    async fn update(&self, customer: Customer) -> CustomerResult<Customer> {
        let mut state = self.state.write().await;

        if !state.customers.contains_key(&customer.id) {
            return Err(CustomerError::NotFound(customer.id));
        }

        state.customers.insert(customer.id, customer.clone());

        tracing::info!(customer_id = %customer.id, "Updated customer");
        Ok(customer)
    }

    async fn address_for(&self, customer_id: Uuid) -> CustomerResult<Option<CustomerAddress>> {
        let state = self.state.read().await;
        Ok(state.addresses.get(&customer_id).cloned())
    }

    async fn upsert_address(
        &self,
        customer_id: Uuid,
        address: Address,
    ) -> CustomerResult<CustomerAddress> {
        let mut state = self.state.write().await;

        if !state.customers.contains_key(&customer_id) {
            return Err(CustomerError::NotFound(customer_id));
        }

        let now = chrono::Utc::now();
        let entry = state
            .addresses
            .entry(customer_id)
            .and_modify(|existing| {
                existing.city = address.city.clone();
                existing.street_address = address.street_address.clone();
                existing.apartment_address = address.apartment_address.clone();
                existing.postal_code = address.postal_code.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| CustomerAddress {
                id: Uuid::now_v7(),
                customer_id,
                city: address.city,
                street_address: address.street_address,
                apartment_address: address.apartment_address,
                postal_code: address.postal_code,
                created_at: now,
                updated_at: now,
            });

        tracing::info!(customer_id = %customer_id, "Upserted customer address");
        Ok(entry.clone())
    }
}
