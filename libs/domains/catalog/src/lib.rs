//! Catalog domain: the category → subcategory → product hierarchy.
//!
//! Provides the hierarchy store (create/lookup/list), the status cascade
//! engine (worklist-based activation/deactivation across the tree), and the
//! HTTP surface for staff catalog management.

pub mod cascade;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use cascade::{CascadeDepth, CascadePolicy, CascadeReport, SubCategoryCascadeReport};
pub use error::{CatalogError, CatalogResult};
pub use models::{
    ActivatedSubCategories, Category, CreateCategory, CreateProduct, CreateSubCategory, Product,
    ProductFilter, SubCategory, SubCategoryStatus, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::{
    CategoryRepository, InMemoryCatalogRepository, ProductRepository, SubCategoryRepository,
};
pub use service::CatalogService;
