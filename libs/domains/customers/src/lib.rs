//! Customers domain: accounts, profile addresses, email confirmation, login.
//!
//! The order flow depends on this domain through its buyer preconditions
//! (confirmed email, complete on-file address); everything else here is
//! standard account plumbing.

pub mod email;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use email::{EmailSender, LoggingEmailSender};
pub use error::{CustomerError, CustomerResult};
pub use models::{
    Address, ConfirmEmail, Customer, CustomerAddress, CustomerProfile, Login, RegisterCustomer,
    TokenResponse, UpsertAddress,
};
pub use postgres::PgCustomerRepository;
pub use repository::{CustomerRepository, InMemoryCustomerRepository};
pub use service::CustomerService;
