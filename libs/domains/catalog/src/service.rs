use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::cascade::{CascadePolicy, CascadeReport, SubCategoryCascadeReport};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    ActivatedSubCategories, Category, CreateCategory, CreateProduct, CreateSubCategory, Product,
    ProductFilter, SubCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository, SubCategoryRepository};

/// Service layer for catalog business logic.
///
/// Owns the activation rules (idempotence conflicts, parent checks) and
/// delegates atomic tree walks to the repository. The cascade policy is
/// injected once at construction.
#[derive(Clone)]
pub struct CatalogService<R>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    repository: Arc<R>,
    policy: CascadePolicy,
}

impl<R> CatalogService<R>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    pub fn new(repository: R, policy: CascadePolicy) -> Self {
        Self {
            repository: Arc::new(repository),
            policy,
        }
    }

    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    /// Create a new category
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_category(input).await
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.repository
            .category_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Get a category by its unique name
    pub async fn get_category_by_name(&self, name: &str) -> CatalogResult<Category> {
        self.repository
            .category_by_name(name)
            .await?
            .ok_or_else(|| CatalogError::CategoryNameNotFound(name.to_string()))
    }

    /// List all categories
    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list_categories().await
    }

    /// Activate a category. Children stay as they are.
    pub async fn activate_category(&self, id: Uuid) -> CatalogResult<Category> {
        let category = self.get_category(id).await?;

        if category.is_active {
            return Err(CatalogError::Conflict(
                "Category already activated".to_string(),
            ));
        }

        self.repository.set_category_active(id, true).await
    }

    /// Deactivate a category, cascading down the hierarchy according to the
    /// configured policy. The walk is atomic.
    pub async fn deactivate_category(&self, id: Uuid) -> CatalogResult<CascadeReport> {
        let category = self.get_category(id).await?;

        if !category.is_active {
            return Err(CatalogError::Conflict(
                "Category already deactivated".to_string(),
            ));
        }

        self.repository
            .deactivate_category_tree(id, self.policy.depth)
            .await
    }

    /// Bulk-activate all inactive direct subcategories of an active category.
    pub async fn activate_all_subcategories(
        &self,
        category_id: Uuid,
    ) -> CatalogResult<ActivatedSubCategories> {
        let category = self.get_category(category_id).await?;

        if !category.is_active {
            return Err(CatalogError::Validation(
                "Parent category deactivated! Please enable the parent category".to_string(),
            ));
        }

        let sub_categories = self
            .repository
            .activate_inactive_subcategories(category_id)
            .await?;

        Ok(ActivatedSubCategories {
            parent_category: category.name,
            sub_categories,
        })
    }

    /// Create a new subcategory under an existing category
    pub async fn create_subcategory(&self, input: CreateSubCategory) -> CatalogResult<SubCategory> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_subcategory(input).await
    }

    /// Get a subcategory by ID
    pub async fn get_subcategory(&self, id: Uuid) -> CatalogResult<SubCategory> {
        self.repository
            .subcategory_by_id(id)
            .await?
            .ok_or(CatalogError::SubCategoryNotFound(id))
    }

    /// List direct subcategories of a category
    pub async fn list_subcategories(&self, category_id: Uuid) -> CatalogResult<Vec<SubCategory>> {
        self.repository.list_subcategories(category_id).await
    }

    /// Activate a subcategory. Rejected while its parent category is inactive.
    pub async fn activate_subcategory(&self, id: Uuid) -> CatalogResult<SubCategory> {
        let sub = self.get_subcategory(id).await?;

        if sub.is_active {
            return Err(CatalogError::Conflict(
                "Subcategory already activated".to_string(),
            ));
        }

        let parent = self.get_category(sub.category_id).await?;
        if !parent.is_active {
            return Err(CatalogError::Validation(
                "Can't activate a subcategory with a deactivated parent category".to_string(),
            ));
        }

        self.repository.set_subcategory_active(id, true).await
    }

    /// Deactivate a subcategory, cascading to its products per the policy.
    pub async fn deactivate_subcategory(
        &self,
        id: Uuid,
    ) -> CatalogResult<SubCategoryCascadeReport> {
        let sub = self.get_subcategory(id).await?;

        if !sub.is_active {
            return Err(CatalogError::Conflict(
                "Subcategory already deactivated".to_string(),
            ));
        }

        self.repository
            .deactivate_subcategory_tree(id, self.policy.depth)
            .await
    }

    /// Create a new product under an existing subcategory
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create_product(input).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .product_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// List products with filters
    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        self.repository.list_products(filter).await
    }

    /// Update a product's editable fields
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.update_product(id, input).await
    }

    /// Activate a product, clearing its `deleted_at` stamp
    pub async fn activate_product(&self, id: Uuid) -> CatalogResult<Product> {
        let product = self.get_product(id).await?;

        if product.is_active {
            return Err(CatalogError::Conflict(
                "Product already activated".to_string(),
            ));
        }

        self.repository.set_product_active(id, true).await
    }

    /// Deactivate a product, stamping `deleted_at`
    pub async fn deactivate_product(&self, id: Uuid) -> CatalogResult<Product> {
        let product = self.get_product(id).await?;

        if !product.is_active {
            return Err(CatalogError::Conflict(
                "Product already deactivated".to_string(),
            ));
        }

        self.repository.set_product_active(id, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::CascadeDepth;
    use crate::repository::InMemoryCatalogRepository;
    use rust_decimal::Decimal;

    fn service(depth: CascadeDepth) -> CatalogService<InMemoryCatalogRepository> {
        CatalogService::new(InMemoryCatalogRepository::new(), CascadePolicy::new(depth))
    }

    async fn seed(
        service: &CatalogService<InMemoryCatalogRepository>,
    ) -> (Category, SubCategory, Product) {
        let category = service
            .create_category(CreateCategory {
                name: "Electronics".to_string(),
            })
            .await
            .unwrap();

        let sub = service
            .create_subcategory(CreateSubCategory {
                category_id: category.id,
                name: "Phones".to_string(),
            })
            .await
            .unwrap();

        let product = service
            .create_product(CreateProduct {
                sub_category_id: sub.id,
                name: "Phone X".to_string(),
                brand: "Acme".to_string(),
                description: "A phone".to_string(),
                price: Decimal::new(500, 0),
                quantity: 100,
            })
            .await
            .unwrap();

        (category, sub, product)
    }

    #[tokio::test]
    async fn test_deactivate_category_cascades_to_subcategories() {
        let service = service(CascadeDepth::FullDepth);
        let (category, sub, _) = seed(&service).await;

        let report = service.deactivate_category(category.id).await.unwrap();
        assert!(!report.category.is_active);

        let sub = service.get_subcategory(sub.id).await.unwrap();
        assert!(!sub.is_active);
    }

    #[tokio::test]
    async fn test_deactivate_already_inactive_category_conflicts() {
        let service = service(CascadeDepth::FullDepth);
        let (category, _, _) = seed(&service).await;

        service.deactivate_category(category.id).await.unwrap();

        let result = service.deactivate_category(category.id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_activate_category_does_not_activate_children() {
        let service = service(CascadeDepth::FullDepth);
        let (category, sub, _) = seed(&service).await;

        service.deactivate_category(category.id).await.unwrap();
        let category = service.activate_category(category.id).await.unwrap();
        assert!(category.is_active);

        // Children stay inactive until activated explicitly
        let sub = service.get_subcategory(sub.id).await.unwrap();
        assert!(!sub.is_active);
    }

    #[tokio::test]
    async fn test_activate_subcategory_under_inactive_parent_rejected() {
        let service = service(CascadeDepth::FullDepth);
        let (category, sub, _) = seed(&service).await;

        service.deactivate_category(category.id).await.unwrap();

        let result = service.activate_subcategory(sub.id).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));

        // Reactivating the parent unblocks the subcategory
        service.activate_category(category.id).await.unwrap();
        let sub = service.activate_subcategory(sub.id).await.unwrap();
        assert!(sub.is_active);
    }

    #[tokio::test]
    async fn test_activate_already_active_subcategory_conflicts() {
        let service = service(CascadeDepth::FullDepth);
        let (_, sub, _) = seed(&service).await;

        let result = service.activate_subcategory(sub.id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_activate_all_subcategories_requires_active_category() {
        let service = service(CascadeDepth::FullDepth);
        let (category, _, _) = seed(&service).await;

        service.deactivate_category(category.id).await.unwrap();

        let result = service.activate_all_subcategories(category.id).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_activate_all_subcategories_returns_statuses() {
        let service = service(CascadeDepth::Subcategories);
        let (category, sub, _) = seed(&service).await;

        service.deactivate_subcategory(sub.id).await.unwrap();

        let result = service
            .activate_all_subcategories(category.id)
            .await
            .unwrap();

        assert_eq!(result.parent_category, "Electronics");
        assert_eq!(result.sub_categories.len(), 1);
        assert!(result.sub_categories[0].is_active);
    }

    #[tokio::test]
    async fn test_subcategory_cascade_respects_policy_depth() {
        // Subcategories depth: products survive a subcategory deactivation
        let service = service(CascadeDepth::Subcategories);
        let (_, sub, product) = seed(&service).await;

        let report = service.deactivate_subcategory(sub.id).await.unwrap();
        assert!(report.deactivated_products.is_empty());

        let product = service.get_product(product.id).await.unwrap();
        assert!(product.is_active);
    }

    #[tokio::test]
    async fn test_subcategory_cascade_full_depth_flips_products() {
        let service = service(CascadeDepth::FullDepth);
        let (_, sub, product) = seed(&service).await;

        let report = service.deactivate_subcategory(sub.id).await.unwrap();
        assert_eq!(report.deactivated_products, vec![product.id]);

        let product = service.get_product(product.id).await.unwrap();
        assert!(!product.is_active);
        assert!(product.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_product_activate_deactivate_conflicts() {
        let service = service(CascadeDepth::FullDepth);
        let (_, _, product) = seed(&service).await;

        let result = service.activate_product(product.id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));

        service.deactivate_product(product.id).await.unwrap();
        let result = service.deactivate_product(product.id).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let service = service(CascadeDepth::FullDepth);

        let result = service.get_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }
}
