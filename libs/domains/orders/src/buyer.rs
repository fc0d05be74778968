//! Buyer lookup seam.
//!
//! Accounts are owned by the customers domain; the order flow only needs the
//! placement preconditions (confirmed email, on-file address). The app wires
//! an adapter over the customer service; tests use a stub.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::AddressFields;

/// The slice of a customer account the order flow cares about.
#[derive(Debug, Clone)]
pub struct BuyerProfile {
    pub id: Uuid,
    pub is_confirmed_email: bool,
    /// On-file profile address, if any
    pub address: Option<AddressFields>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuyerDirectory: Send + Sync {
    /// Look up a buyer by account ID. `None` when the account is unknown.
    async fn buyer(&self, id: Uuid) -> OrderResult<Option<BuyerProfile>>;
}
