use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{JwtAuth, JwtConfig};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::email::EmailSender;
use crate::error::{CustomerError, CustomerResult};
use crate::models::{
    Address, Customer, CustomerAddress, CustomerProfile, Login, RegisterCustomer, TokenResponse,
    UpsertAddress,
};
use crate::repository::CustomerRepository;

/// Lifetime of an email-confirmation token
const CONFIRMATION_TOKEN_TTL_HOURS: i64 = 48;

/// Claims of the email-confirmation token (distinct from access tokens)
#[derive(Debug, Serialize, Deserialize)]
struct ConfirmationClaims {
    sub: String,
    purpose: String,
    exp: i64,
}

const CONFIRMATION_PURPOSE: &str = "confirm_email";

/// Service layer for customer account logic
#[derive(Clone)]
pub struct CustomerService<R: CustomerRepository> {
    repository: Arc<R>,
    email: Arc<dyn EmailSender>,
    jwt: JwtAuth,
    confirmation_secret: String,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repository: R, email: Arc<dyn EmailSender>, jwt_config: &JwtConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            email,
            jwt: JwtAuth::new(jwt_config),
            confirmation_secret: jwt_config.secret.clone(),
        }
    }

    /// Register a new account.
    ///
    /// The confirmation email is best-effort: a failed send is logged and the
    /// registration still succeeds.
    pub async fn register(&self, input: RegisterCustomer) -> CustomerResult<CustomerProfile> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        let password_hash = self.hash_password(&input.password)?;
        let customer = Customer::new(input, password_hash);

        let created = self.repository.create(customer).await?;

        let token = self.create_confirmation_token(created.id)?;
        if let Err(e) = self.email.send_confirmation(&created.email, &token).await {
            tracing::warn!(customer_id = %created.id, "Confirmation email failed: {}", e);
        }

        Ok(created.profile(None))
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, input: Login) -> CustomerResult<TokenResponse> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        let customer = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(CustomerError::InvalidCredentials)?;

        if !customer.is_active {
            return Err(CustomerError::InvalidCredentials);
        }

        if !self.verify_password(&input.password, &customer.password_hash)? {
            return Err(CustomerError::InvalidCredentials);
        }

        let token = self
            .jwt
            .create_access_token(
                &customer.id.to_string(),
                &customer.email,
                customer.is_staff,
            )
            .map_err(|e| CustomerError::Internal(format!("Token creation failed: {}", e)))?;

        tracing::info!(customer_id = %customer.id, "Customer logged in");
        Ok(TokenResponse::bearer(token))
    }

    /// Confirm an email address from the token sent at registration.
    ///
    /// Fails with Conflict when the email is already confirmed.
    pub async fn confirm_email(&self, token: &str) -> CustomerResult<CustomerProfile> {
        let customer_id = self.verify_confirmation_token(token)?;

        let mut customer = self
            .repository
            .get_by_id(customer_id)
            .await?
            .ok_or(CustomerError::NotFound(customer_id))?;

        if customer.is_confirmed_email {
            return Err(CustomerError::EmailAlreadyConfirmed);
        }

        customer.is_confirmed_email = true;
        customer.updated_at = Utc::now();
        let updated = self.repository.update(customer).await?;

        tracing::info!(customer_id = %customer_id, "Email confirmed");
        let address = self.repository.address_for(customer_id).await?;
        Ok(updated.profile(address.map(|a| a.fields())))
    }

    /// Get a customer's profile with the on-file address
    pub async fn profile(&self, id: Uuid) -> CustomerResult<CustomerProfile> {
        let customer = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let address = self.repository.address_for(id).await?;
        Ok(customer.profile(address.map(|a| a.fields())))
    }

    /// Get a customer by ID (internal view with flags)
    pub async fn get_customer(&self, id: Uuid) -> CustomerResult<Customer> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Get the on-file address of a customer, if any
    pub async fn address(&self, id: Uuid) -> CustomerResult<Option<Address>> {
        Ok(self
            .repository
            .address_for(id)
            .await?
            .map(|a| a.fields()))
    }

    /// Create or replace the profile address
    pub async fn upsert_address(
        &self,
        id: Uuid,
        input: UpsertAddress,
    ) -> CustomerResult<CustomerAddress> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        self.repository.upsert_address(id, input.address).await
    }

    fn hash_password(&self, password: &str) -> CustomerResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CustomerError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> CustomerResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| CustomerError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn create_confirmation_token(&self, customer_id: Uuid) -> CustomerResult<String> {
        let claims = ConfirmationClaims {
            sub: customer_id.to_string(),
            purpose: CONFIRMATION_PURPOSE.to_string(),
            exp: (Utc::now() + Duration::hours(CONFIRMATION_TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.confirmation_secret.as_bytes()),
        )
        .map_err(|e| CustomerError::Internal(format!("Token creation failed: {}", e)))
    }

    fn verify_confirmation_token(&self, token: &str) -> CustomerResult<Uuid> {
        let data = decode::<ConfirmationClaims>(
            token,
            &DecodingKey::from_secret(self.confirmation_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| CustomerError::InvalidToken)?;

        if data.claims.purpose != CONFIRMATION_PURPOSE {
            return Err(CustomerError::InvalidToken);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| CustomerError::InvalidToken)
    }
}
