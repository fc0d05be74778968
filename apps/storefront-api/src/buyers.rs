//! Adapter giving the orders domain its view of customer accounts.

use async_trait::async_trait;
use uuid::Uuid;

use domain_customers::{CustomerError, CustomerRepository, CustomerService};
use domain_orders::{AddressFields, BuyerDirectory, BuyerProfile, OrderError, OrderResult};

/// [`BuyerDirectory`] backed by the customer service.
#[derive(Clone)]
pub struct CustomerBuyerDirectory<R: CustomerRepository> {
    customers: CustomerService<R>,
}

impl<R: CustomerRepository> CustomerBuyerDirectory<R> {
    pub fn new(customers: CustomerService<R>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl<R: CustomerRepository> BuyerDirectory for CustomerBuyerDirectory<R> {
    async fn buyer(&self, id: Uuid) -> OrderResult<Option<BuyerProfile>> {
        let customer = match self.customers.get_customer(id).await {
            Ok(customer) => customer,
            Err(CustomerError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(OrderError::Internal(e.to_string())),
        };

        let address = self
            .customers
            .address(id)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .map(|a| AddressFields {
                city: a.city,
                street_address: a.street_address,
                apartment_address: a.apartment_address,
                postal_code: a.postal_code,
            });

        Ok(Some(BuyerProfile {
            id: customer.id,
            is_confirmed_email: customer.is_confirmed_email,
            address,
        }))
    }
}
