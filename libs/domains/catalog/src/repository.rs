use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cascade::{CascadeDepth, CascadeReport, SubCategoryCascadeReport};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, CreateSubCategory, Product, ProductFilter,
    SubCategory, SubCategoryStatus, UpdateProduct,
};

/// Repository trait for Category persistence
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category (name must be unique)
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Get a category by ID
    async fn category_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    /// Get a category by its unique name
    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    /// List all categories, newest first
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    /// Flip the active flag on a single category, touching nothing below it
    async fn set_category_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Category>;

    /// Deactivate a category and walk its descendants according to `depth`.
    ///
    /// The whole walk is atomic: all flips land or none do. Fails with
    /// Conflict when the category is already inactive.
    async fn deactivate_category_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<CascadeReport>;

    /// Bulk-activate every inactive direct subcategory of a category,
    /// returning the resulting {name, is_active} list. Products untouched.
    async fn activate_inactive_subcategories(
        &self,
        category_id: Uuid,
    ) -> CatalogResult<Vec<SubCategoryStatus>>;
}

/// Repository trait for SubCategory persistence
#[async_trait]
pub trait SubCategoryRepository: Send + Sync {
    /// Create a new subcategory (parent must exist, name must be unique)
    async fn create_subcategory(&self, input: CreateSubCategory) -> CatalogResult<SubCategory>;

    /// Get a subcategory by ID
    async fn subcategory_by_id(&self, id: Uuid) -> CatalogResult<Option<SubCategory>>;

    /// Get a subcategory by its unique name
    async fn subcategory_by_name(&self, name: &str) -> CatalogResult<Option<SubCategory>>;

    /// List direct subcategories of a category, newest first
    async fn list_subcategories(&self, category_id: Uuid) -> CatalogResult<Vec<SubCategory>>;

    /// Flip the active flag on a single subcategory
    async fn set_subcategory_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> CatalogResult<SubCategory>;

    /// Deactivate a subcategory and, at full depth, its products. Atomic.
    async fn deactivate_subcategory_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<SubCategoryCascadeReport>;
}

/// Repository trait for Product persistence
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product (subcategory must exist)
    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn product_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// List products with optional filters
    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Update a product's editable fields
    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Flip the active flag, stamping or clearing `deleted_at`
    async fn set_product_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Product>;
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: HashMap<Uuid, Category>,
    subcategories: HashMap<Uuid, SubCategory>,
    products: HashMap<Uuid, Product>,
}

/// Worklist node for the in-memory cascade walk
enum Node {
    SubCategory(Uuid),
    Product(Uuid),
}

/// In-memory implementation of the catalog repositories (for development/testing)
///
/// One struct implements all three entity repositories so the cascade can
/// mutate the whole tree under a single write guard, mirroring the
/// single-transaction semantics of the PostgreSQL implementation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState::default())),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        let name_exists = state
            .categories
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&input.name));

        if name_exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let category = Category::new(input);
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn category_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut result: Vec<Category> = state.categories.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn set_category_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        let category = state
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;
        category.is_active = is_active;
        let updated = category.clone();

        tracing::info!(category_id = %id, is_active, "Updated category status");
        Ok(updated)
    }

    async fn deactivate_category_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<CascadeReport> {
        let mut state = self.state.write().await;

        let category = state
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;

        if !category.is_active {
            return Err(CatalogError::Conflict(
                "Category already deactivated".to_string(),
            ));
        }

        category.is_active = false;
        let mut report = CascadeReport::new(category.clone());

        if depth.includes_subcategories() {
            // Explicit worklist over currently-active descendants
            let mut worklist: Vec<Node> = state
                .subcategories
                .values()
                .filter(|s| s.category_id == id && s.is_active)
                .map(|s| Node::SubCategory(s.id))
                .collect();

            while let Some(node) = worklist.pop() {
                match node {
                    Node::SubCategory(sub_id) => {
                        if let Some(sub) = state.subcategories.get_mut(&sub_id) {
                            sub.is_active = false;
                            report.deactivated_subcategories.push(sub_id);
                        }
                        if depth.includes_products() {
                            worklist.extend(
                                state
                                    .products
                                    .values()
                                    .filter(|p| p.sub_category_id == sub_id && p.is_active)
                                    .map(|p| Node::Product(p.id)),
                            );
                        }
                    }
                    Node::Product(product_id) => {
                        if let Some(product) = state.products.get_mut(&product_id) {
                            product.set_active(false);
                            report.deactivated_products.push(product_id);
                        }
                    }
                }
            }
        }

        tracing::info!(
            category_id = %id,
            subcategories = report.deactivated_subcategories.len(),
            products = report.deactivated_products.len(),
            "Deactivated category tree"
        );
        Ok(report)
    }

    async fn activate_inactive_subcategories(
        &self,
        category_id: Uuid,
    ) -> CatalogResult<Vec<SubCategoryStatus>> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&category_id) {
            return Err(CatalogError::CategoryNotFound(category_id));
        }

        for sub in state
            .subcategories
            .values_mut()
            .filter(|s| s.category_id == category_id && !s.is_active)
        {
            sub.is_active = true;
        }

        let mut result: Vec<(chrono::DateTime<chrono::Utc>, SubCategoryStatus)> = state
            .subcategories
            .values()
            .filter(|s| s.category_id == category_id && s.is_active)
            .map(|s| {
                (
                    s.created_at,
                    SubCategoryStatus {
                        name: s.name.clone(),
                        is_active: s.is_active,
                    },
                )
            })
            .collect();
        result.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(result.into_iter().map(|(_, status)| status).collect())
    }
}

#[async_trait]
impl SubCategoryRepository for InMemoryCatalogRepository {
    async fn create_subcategory(&self, input: CreateSubCategory) -> CatalogResult<SubCategory> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&input.category_id) {
            return Err(CatalogError::Validation(format!(
                "Parent category {} does not exist",
                input.category_id
            )));
        }

        let name_exists = state
            .subcategories
            .values()
            .any(|s| s.name.eq_ignore_ascii_case(&input.name));

        if name_exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let sub_category = SubCategory::new(input);
        state
            .subcategories
            .insert(sub_category.id, sub_category.clone());

        tracing::info!(sub_category_id = %sub_category.id, "Created subcategory");
        Ok(sub_category)
    }

    async fn subcategory_by_id(&self, id: Uuid) -> CatalogResult<Option<SubCategory>> {
        let state = self.state.read().await;
        Ok(state.subcategories.get(&id).cloned())
    }

    async fn subcategory_by_name(&self, name: &str) -> CatalogResult<Option<SubCategory>> {
        let state = self.state.read().await;
        Ok(state
            .subcategories
            .values()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn list_subcategories(&self, category_id: Uuid) -> CatalogResult<Vec<SubCategory>> {
        let state = self.state.read().await;
        let mut result: Vec<SubCategory> = state
            .subcategories
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn set_subcategory_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> CatalogResult<SubCategory> {
        let mut state = self.state.write().await;

        let sub = state
            .subcategories
            .get_mut(&id)
            .ok_or(CatalogError::SubCategoryNotFound(id))?;
        sub.is_active = is_active;
        let updated = sub.clone();

        tracing::info!(sub_category_id = %id, is_active, "Updated subcategory status");
        Ok(updated)
    }

    async fn deactivate_subcategory_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<SubCategoryCascadeReport> {
        let mut state = self.state.write().await;

        let sub = state
            .subcategories
            .get_mut(&id)
            .ok_or(CatalogError::SubCategoryNotFound(id))?;

        if !sub.is_active {
            return Err(CatalogError::Conflict(
                "Subcategory already deactivated".to_string(),
            ));
        }

        sub.is_active = false;
        let mut report = SubCategoryCascadeReport::new(sub.clone());

        if depth.includes_products() {
            let product_ids: Vec<Uuid> = state
                .products
                .values()
                .filter(|p| p.sub_category_id == id && p.is_active)
                .map(|p| p.id)
                .collect();

            for product_id in product_ids {
                if let Some(product) = state.products.get_mut(&product_id) {
                    product.set_active(false);
                    report.deactivated_products.push(product_id);
                }
            }
        }

        tracing::info!(
            sub_category_id = %id,
            products = report.deactivated_products.len(),
            "Deactivated subcategory tree"
        );
        Ok(report)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogRepository {
    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.subcategories.contains_key(&input.sub_category_id) {
            return Err(CatalogError::Validation(format!(
                "Parent subcategory {} does not exist",
                input.sub_category_id
            )));
        }

        let product = Product::new(input);
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn product_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;

        let mut result: Vec<Product> = state
            .products
            .values()
            .filter(|p| {
                if let Some(sub_id) = filter.sub_category_id {
                    if p.sub_category_id != sub_id {
                        return false;
                    }
                }
                if let Some(ref brand) = filter.brand {
                    if !p.brand.eq_ignore_ascii_case(brand) {
                        return false;
                    }
                }
                if let Some(ref search) = filter.search {
                    let needle = search.to_lowercase();
                    let haystack = format!(
                        "{} {} {}",
                        p.name.to_lowercase(),
                        p.description.to_lowercase(),
                        p.brand.to_lowercase()
                    );
                    if !haystack.contains(&needle) {
                        return false;
                    }
                }
                if let Some(is_active) = filter.is_active {
                    if p.is_active != is_active {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Sort by created_at descending (newest first)
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Apply pagination
        let result: Vec<Product> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(result)
    }

    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn set_product_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        let product = state
            .products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.set_active(is_active);
        let updated = product.clone();

        tracing::info!(product_id = %id, is_active, "Updated product status");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn seed_tree(repo: &InMemoryCatalogRepository) -> (Category, SubCategory, Product) {
        let category = repo
            .create_category(CreateCategory {
                name: "Electronics".to_string(),
            })
            .await
            .unwrap();

        let sub = repo
            .create_subcategory(CreateSubCategory {
                category_id: category.id,
                name: "Phones".to_string(),
            })
            .await
            .unwrap();

        let product = repo
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
    async fn test_create_and_get_category() {
        let repo = InMemoryCatalogRepository::new();

        let category = repo
            .create_category(CreateCategory {
                name: "Electronics".to_string(),
            })
            .await
            .unwrap();

        let fetched = repo.category_by_id(category.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Electronics");
        assert!(fetched.is_active);

        let by_name = repo.category_by_name("Electronics").await.unwrap();
        assert!(by_name.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let repo = InMemoryCatalogRepository::new();

        repo.create_category(CreateCategory {
            name: "Electronics".to_string(),
        })
        .await
        .unwrap();

        let result = repo
            .create_category(CreateCategory {
                name: "electronics".to_string(),
            })
            .await;
        assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_subcategory_requires_existing_parent() {
        let repo = InMemoryCatalogRepository::new();

        let result = repo
            .create_subcategory(CreateSubCategory {
                category_id: Uuid::now_v7(),
                name: "Phones".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_product_requires_existing_parent() {
        let repo = InMemoryCatalogRepository::new();

        let result = repo
            .create_product(CreateProduct {
                sub_category_id: Uuid::now_v7(),
                name: "Phone X".to_string(),
                brand: "Acme".to_string(),
                description: String::new(),
                price: Decimal::new(500, 0),
                quantity: 100,
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_full_depth_cascade_flips_whole_tree() {
        let repo = InMemoryCatalogRepository::new();
        let (category, sub, product) = seed_tree(&repo).await;

        let report = repo
            .deactivate_category_tree(category.id, CascadeDepth::FullDepth)
            .await
            .unwrap();

        assert!(!report.category.is_active);
        assert_eq!(report.deactivated_subcategories, vec![sub.id]);
        assert_eq!(report.deactivated_products, vec![product.id]);

        let sub = repo.subcategory_by_id(sub.id).await.unwrap().unwrap();
        assert!(!sub.is_active);

        let product = repo.product_by_id(product.id).await.unwrap().unwrap();
        assert!(!product.is_active);
        assert!(product.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_subcategories_depth_leaves_products_alone() {
        let repo = InMemoryCatalogRepository::new();
        let (category, sub, product) = seed_tree(&repo).await;

        let report = repo
            .deactivate_category_tree(category.id, CascadeDepth::Subcategories)
            .await
            .unwrap();

        assert_eq!(report.deactivated_subcategories, vec![sub.id]);
        assert!(report.deactivated_products.is_empty());

        let product = repo.product_by_id(product.id).await.unwrap().unwrap();
        assert!(product.is_active);
    }

    #[tokio::test]
    async fn test_category_only_depth_leaves_subcategories_alone() {
        let repo = InMemoryCatalogRepository::new();
        let (category, sub, _product) = seed_tree(&repo).await;

        let report = repo
            .deactivate_category_tree(category.id, CascadeDepth::CategoryOnly)
            .await
            .unwrap();

        assert!(report.deactivated_subcategories.is_empty());

        let sub = repo.subcategory_by_id(sub.id).await.unwrap().unwrap();
        assert!(sub.is_active);
    }

    #[tokio::test]
    async fn test_cascade_skips_already_inactive_subcategories() {
        let repo = InMemoryCatalogRepository::new();
        let (category, sub, _product) = seed_tree(&repo).await;

        repo.set_subcategory_active(sub.id, false).await.unwrap();

        let report = repo
            .deactivate_category_tree(category.id, CascadeDepth::FullDepth)
            .await
            .unwrap();

        // The inactive subcategory was not walked, so its products survive
        assert!(report.deactivated_subcategories.is_empty());
        assert!(report.deactivated_products.is_empty());
    }

    #[tokio::test]
    async fn test_deactivate_inactive_category_is_conflict() {
        let repo = InMemoryCatalogRepository::new();
        let (category, _, _) = seed_tree(&repo).await;

        repo.deactivate_category_tree(category.id, CascadeDepth::FullDepth)
            .await
            .unwrap();

        let result = repo
            .deactivate_category_tree(category.id, CascadeDepth::FullDepth)
            .await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_activate_inactive_subcategories() {
        let repo = InMemoryCatalogRepository::new();
        let (category, sub, _product) = seed_tree(&repo).await;

        repo.set_subcategory_active(sub.id, false).await.unwrap();

        let statuses = repo
            .activate_inactive_subcategories(category.id)
            .await
            .unwrap();

        assert_eq!(
            statuses,
            vec![SubCategoryStatus {
                name: "Phones".to_string(),
                is_active: true
            }]
        );
    }

    #[tokio::test]
    async fn test_product_filter_by_search_and_brand() {
        let repo = InMemoryCatalogRepository::new();
        let (_, sub, _) = seed_tree(&repo).await;

        repo.create_product(CreateProduct {
            sub_category_id: sub.id,
            name: "Tablet Z".to_string(),
            brand: "Orbit".to_string(),
            description: "A tablet".to_string(),
            price: Decimal::new(300, 0),
            quantity: 5,
        })
        .await
        .unwrap();

        let by_brand = repo
            .list_products(ProductFilter {
                brand: Some("orbit".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].name, "Tablet Z");

        let by_search = repo
            .list_products(ProductFilter {
                search: Some("phone".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].name, "Phone X");
    }
}
