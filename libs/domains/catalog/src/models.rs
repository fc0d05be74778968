use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Custom validator rejecting negative prices
fn validate_non_negative_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Top-level catalog node
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Category name (globally unique)
    pub name: String,
    /// Whether the category is active
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Second-level catalog node, owned by a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    /// Unique identifier
    pub id: Uuid,
    /// Owning category
    pub category_id: Uuid,
    /// Subcategory name (globally unique)
    pub name: String,
    /// Whether the subcategory is active
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Sellable product, owned by a subcategory
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Owning subcategory
    pub sub_category_id: Uuid,
    pub name: String,
    pub brand: String,
    pub description: String,
    /// Unit price (non-negative)
    pub price: Decimal,
    /// Units in stock (non-negative)
    pub quantity: i32,
    /// Whether the product is purchasable
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stamped when the product is deactivated, cleared on reactivation
    pub deleted_at: Option<DateTime<Utc>>,
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 155))]
    pub name: String,
}

/// DTO for creating a subcategory
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubCategory {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 155))]
    pub name: String,
}

/// DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    pub sub_category_id: Uuid,
    #[validate(length(min = 1, max = 155))]
    pub name: String,
    #[validate(length(min = 1, max = 155))]
    pub brand: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

/// DTO for updating a product's editable fields
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 155))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 155))]
    pub brand: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative_price"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Restrict to one subcategory
    pub sub_category_id: Option<Uuid>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Substring search over name, description and brand
    pub search: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            sub_category_id: None,
            brand: None,
            search: None,
            is_active: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// {name, is_active} pair returned by the bulk subcategory activation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SubCategoryStatus {
    pub name: String,
    pub is_active: bool,
}

/// Result of bulk-activating all subcategories of a category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivatedSubCategories {
    pub parent_category: String,
    pub sub_categories: Vec<SubCategoryStatus>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl SubCategory {
    pub fn new(input: CreateSubCategory) -> Self {
        Self {
            id: Uuid::now_v7(),
            category_id: input.category_id,
            name: input.name,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            sub_category_id: input.sub_category_id,
            name: input.name,
            brand: input.brand,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        self.updated_at = Utc::now();
    }

    /// Flip the active flag, stamping or clearing `deleted_at`.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.deleted_at = if is_active { None } else { Some(Utc::now()) };
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_validates_negative_price() {
        let input = CreateProduct {
            sub_category_id: Uuid::now_v7(),
            name: "Phone X".to_string(),
            brand: "Acme".to_string(),
            description: String::new(),
            price: Decimal::new(-500, 0),
            quantity: 10,
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_product_validates_negative_quantity() {
        let input = CreateProduct {
            sub_category_id: Uuid::now_v7(),
            name: "Phone X".to_string(),
            brand: "Acme".to_string(),
            description: String::new(),
            price: Decimal::new(500, 0),
            quantity: -1,
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_product_set_active_stamps_deleted_at() {
        let mut product = Product::new(CreateProduct {
            sub_category_id: Uuid::now_v7(),
            name: "Phone X".to_string(),
            brand: "Acme".to_string(),
            description: String::new(),
            price: Decimal::new(500, 0),
            quantity: 10,
        });

        product.set_active(false);
        assert!(!product.is_active);
        assert!(product.deleted_at.is_some());

        product.set_active(true);
        assert!(product.is_active);
        assert!(product.deleted_at.is_none());
    }

    #[test]
    fn test_product_apply_update() {
        let mut product = Product::new(CreateProduct {
            sub_category_id: Uuid::now_v7(),
            name: "Phone X".to_string(),
            brand: "Acme".to_string(),
            description: String::new(),
            price: Decimal::new(500, 0),
            quantity: 10,
        });

        product.apply_update(UpdateProduct {
            price: Some(Decimal::new(450, 0)),
            quantity: Some(25),
            ..Default::default()
        });

        assert_eq!(product.price, Decimal::new(450, 0));
        assert_eq!(product.quantity, 25);
        assert_eq!(product.name, "Phone X");
    }
}
