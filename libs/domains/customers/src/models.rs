use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Customer account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    /// Email address (unique, doubles as login)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 hash, never serialized
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_confirmed_email: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plain address fields, shared by the profile address and order snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub street_address: String,
    #[validate(length(min = 1, max = 100))]
    pub apartment_address: String,
    #[validate(length(max = 20))]
    pub postal_code: String,
}

impl Address {
    /// A complete address is required before placing an order against the
    /// on-file profile address.
    pub fn is_complete(&self) -> bool {
        !self.city.is_empty()
            && !self.street_address.is_empty()
            && !self.apartment_address.is_empty()
            && !self.postal_code.is_empty()
    }
}

/// Persisted profile address (one per customer)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerAddress {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub city: String,
    pub street_address: String,
    pub apartment_address: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerAddress {
    pub fn fields(&self) -> Address {
        Address {
            city: self.city.clone(),
            street_address: self.street_address.clone(),
            apartment_address: self.apartment_address.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

/// Public view of a customer, with the on-file address when present
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_confirmed_email: bool,
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
}

/// DTO for account registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterCustomer {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password too short"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub last_name: String,
}

/// DTO for login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Login {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for email confirmation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConfirmEmail {
    #[validate(length(min = 1))]
    pub token: String,
}

/// DTO for creating or replacing the profile address
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertAddress {
    #[validate(nested)]
    #[serde(flatten)]
    pub address: Address,
}

/// Issued access token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
        }
    }
}

impl Customer {
    pub fn new(input: RegisterCustomer, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
            is_staff: false,
            is_active: true,
            is_confirmed_email: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self, address: Option<Address>) -> CustomerProfile {
        CustomerProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_staff: self.is_staff,
            is_confirmed_email: self.is_confirmed_email,
            address,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_completeness() {
        let mut address = Address {
            city: "Berlin".to_string(),
            street_address: "Unter den Linden 1".to_string(),
            apartment_address: "Apt 4".to_string(),
            postal_code: "10117".to_string(),
        };
        assert!(address.is_complete());

        address.postal_code = String::new();
        assert!(!address.is_complete());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let input = RegisterCustomer {
            email: "buyer@example.com".to_string(),
            password: "1234567".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let input = RegisterCustomer {
            email: "not-an-email".to_string(),
            password: "12345678".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
