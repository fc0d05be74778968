use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    cascade::{CascadeDepth, CascadeReport, SubCategoryCascadeReport},
    entity::{category, product, subcategory},
    error::{CatalogError, CatalogResult},
    models::{
        Category, CreateCategory, CreateProduct, CreateSubCategory, Product, ProductFilter,
        SubCategory, SubCategoryStatus, UpdateProduct,
    },
    repository::{CategoryRepository, ProductRepository, SubCategoryRepository},
};

fn db_err(e: sea_orm::DbErr) -> CatalogError {
    CatalogError::Internal(format!("Database error: {}", e))
}

/// Worklist node for the transactional cascade walk
enum Node {
    SubCategory(subcategory::Model),
    Product(product::Model),
}

/// PostgreSQL implementation of the catalog repositories.
///
/// One struct implements all three entity repositories over a shared
/// connection pool, so cascades can run in a single transaction.
pub struct PgCatalogRepository {
    categories: BaseRepository<category::Entity>,
    subcategories: BaseRepository<subcategory::Entity>,
    products: BaseRepository<product::Entity>,
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: BaseRepository::new(db.clone()),
            subcategories: BaseRepository::new(db.clone()),
            products: BaseRepository::new(db.clone()),
            db,
        }
    }

    /// Deactivate a product row inside a transaction, stamping `deleted_at`.
    async fn deactivate_product_in_txn(
        txn: &DatabaseTransaction,
        model: product::Model,
    ) -> CatalogResult<Uuid> {
        let product_id = model.id;
        let mut active: product::ActiveModel = model.into_active_model();
        active.is_active = Set(false);
        active.deleted_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await.map_err(db_err)?;
        Ok(product_id)
    }

    /// The worklist walk for a category deactivation. Runs on a transaction;
    /// the caller commits or rolls back.
    async fn deactivate_category_in_txn(
        txn: &DatabaseTransaction,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<CascadeReport> {
        // Lock the root row so concurrent cascades serialize
        let model = category::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        // Re-check under lock: the service pre-checks too, but another
        // request may have won the race
        if !model.is_active {
            return Err(CatalogError::Conflict(
                "Category already deactivated".to_string(),
            ));
        }

        let mut active: category::ActiveModel = model.into_active_model();
        active.is_active = Set(false);
        let flipped = active.update(txn).await.map_err(db_err)?;

        let mut report = CascadeReport::new(flipped.into());

        if depth.includes_subcategories() {
            // Explicit worklist over currently-active descendants (no recursion)
            let mut worklist: Vec<Node> = subcategory::Entity::find()
                .filter(subcategory::Column::CategoryId.eq(id))
                .filter(subcategory::Column::IsActive.eq(true))
                .all(txn)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(Node::SubCategory)
                .collect();

            while let Some(node) = worklist.pop() {
                match node {
                    Node::SubCategory(sub) => {
                        let sub_id = sub.id;
                        let mut active: subcategory::ActiveModel = sub.into_active_model();
                        active.is_active = Set(false);
                        active.update(txn).await.map_err(db_err)?;
                        report.deactivated_subcategories.push(sub_id);

                        if depth.includes_products() {
                            let children = product::Entity::find()
                                .filter(product::Column::SubCategoryId.eq(sub_id))
                                .filter(product::Column::IsActive.eq(true))
                                .all(txn)
                                .await
                                .map_err(db_err)?;
                            worklist.extend(children.into_iter().map(Node::Product));
                        }
                    }
                    Node::Product(model) => {
                        let product_id = Self::deactivate_product_in_txn(txn, model).await?;
                        report.deactivated_products.push(product_id);
                    }
                }
            }
        }

        Ok(report)
    }

    async fn deactivate_subcategory_in_txn(
        txn: &DatabaseTransaction,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<SubCategoryCascadeReport> {
        let model = subcategory::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::SubCategoryNotFound(id))?;

        if !model.is_active {
            return Err(CatalogError::Conflict(
                "Subcategory already deactivated".to_string(),
            ));
        }

        let mut active: subcategory::ActiveModel = model.into_active_model();
        active.is_active = Set(false);
        let flipped = active.update(txn).await.map_err(db_err)?;

        let mut report = SubCategoryCascadeReport::new(flipped.into());

        if depth.includes_products() {
            let children = product::Entity::find()
                .filter(product::Column::SubCategoryId.eq(id))
                .filter(product::Column::IsActive.eq(true))
                .all(txn)
                .await
                .map_err(db_err)?;

            for model in children {
                let product_id = Self::deactivate_product_in_txn(txn, model).await?;
                report.deactivated_products.push(product_id);
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let exists = self.category_by_name(&input.name).await?.is_some();
        if exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let active_model: category::ActiveModel = input.into();
        let model = self.categories.insert(active_model).await.map_err(db_err)?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn category_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let model = self.categories.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn category_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(self.categories.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_desc(category::Column::CreatedAt)
            .all(self.categories.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn set_category_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Category> {
        let model = self
            .categories
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut active: category::ActiveModel = model.into_active_model();
        active.is_active = Set(is_active);
        let updated = self.categories.update(active).await.map_err(db_err)?;

        tracing::info!(category_id = %id, is_active, "Updated category status");
        Ok(updated.into())
    }

    async fn deactivate_category_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<CascadeReport> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match Self::deactivate_category_in_txn(&txn, id, depth).await {
            Ok(report) => {
                txn.commit().await.map_err(db_err)?;
                tracing::info!(
                    category_id = %id,
                    subcategories = report.deactivated_subcategories.len(),
                    products = report.deactivated_products.len(),
                    "Deactivated category tree"
                );
                Ok(report)
            }
            Err(e) => {
                txn.rollback().await.ok();
                Err(e)
            }
        }
    }

    async fn activate_inactive_subcategories(
        &self,
        category_id: Uuid,
    ) -> CatalogResult<Vec<SubCategoryStatus>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let result: CatalogResult<Vec<SubCategoryStatus>> = async {
            subcategory::Entity::update_many()
                .col_expr(subcategory::Column::IsActive, Expr::value(true))
                .filter(subcategory::Column::CategoryId.eq(category_id))
                .filter(subcategory::Column::IsActive.eq(false))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            let subs = subcategory::Entity::find()
                .filter(subcategory::Column::CategoryId.eq(category_id))
                .filter(subcategory::Column::IsActive.eq(true))
                .order_by_desc(subcategory::Column::CreatedAt)
                .all(&txn)
                .await
                .map_err(db_err)?;

            Ok(subs
                .into_iter()
                .map(|s| SubCategoryStatus {
                    name: s.name,
                    is_active: s.is_active,
                })
                .collect())
        }
        .await;

        match result {
            Ok(statuses) => {
                txn.commit().await.map_err(db_err)?;
                tracing::info!(
                    category_id = %category_id,
                    count = statuses.len(),
                    "Activated subcategories"
                );
                Ok(statuses)
            }
            Err(e) => {
                txn.rollback().await.ok();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SubCategoryRepository for PgCatalogRepository {
    async fn create_subcategory(&self, input: CreateSubCategory) -> CatalogResult<SubCategory> {
        let parent = self
            .categories
            .find_by_id(input.category_id)
            .await
            .map_err(db_err)?;
        if parent.is_none() {
            return Err(CatalogError::Validation(format!(
                "Parent category {} does not exist",
                input.category_id
            )));
        }

        let exists = self.subcategory_by_name(&input.name).await?.is_some();
        if exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let active_model: subcategory::ActiveModel = input.into();
        let model = self
            .subcategories
            .insert(active_model)
            .await
            .map_err(db_err)?;

        tracing::info!(sub_category_id = %model.id, "Created subcategory");
        Ok(model.into())
    }

    async fn subcategory_by_id(&self, id: Uuid) -> CatalogResult<Option<SubCategory>> {
        let model = self.subcategories.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn subcategory_by_name(&self, name: &str) -> CatalogResult<Option<SubCategory>> {
        let model = subcategory::Entity::find()
            .filter(subcategory::Column::Name.eq(name))
            .one(self.subcategories.db())
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn list_subcategories(&self, category_id: Uuid) -> CatalogResult<Vec<SubCategory>> {
        let models = subcategory::Entity::find()
            .filter(subcategory::Column::CategoryId.eq(category_id))
            .order_by_desc(subcategory::Column::CreatedAt)
            .all(self.subcategories.db())
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn set_subcategory_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> CatalogResult<SubCategory> {
        let model = self
            .subcategories
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::SubCategoryNotFound(id))?;

        let mut active: subcategory::ActiveModel = model.into_active_model();
        active.is_active = Set(is_active);
        let updated = self.subcategories.update(active).await.map_err(db_err)?;

        tracing::info!(sub_category_id = %id, is_active, "Updated subcategory status");
        Ok(updated.into())
    }

    async fn deactivate_subcategory_tree(
        &self,
        id: Uuid,
        depth: CascadeDepth,
    ) -> CatalogResult<SubCategoryCascadeReport> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match Self::deactivate_subcategory_in_txn(&txn, id, depth).await {
            Ok(report) => {
                txn.commit().await.map_err(db_err)?;
                tracing::info!(
                    sub_category_id = %id,
                    products = report.deactivated_products.len(),
                    "Deactivated subcategory tree"
                );
                Ok(report)
            }
            Err(e) => {
                txn.rollback().await.ok();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let parent = self
            .subcategories
            .find_by_id(input.sub_category_id)
            .await
            .map_err(db_err)?;
        if parent.is_none() {
            return Err(CatalogError::Validation(format!(
                "Parent subcategory {} does not exist",
                input.sub_category_id
            )));
        }

        let active_model: product::ActiveModel = input.into();
        let model = self.products.insert(active_model).await.map_err(db_err)?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn product_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let model = self.products.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(|m| m.into()))
    }

    async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let mut query = product::Entity::find();

        if let Some(sub_category_id) = filter.sub_category_id {
            query = query.filter(product::Column::SubCategoryId.eq(sub_category_id));
        }

        if let Some(ref brand) = filter.brand {
            query = query.filter(product::Column::Brand.eq(brand));
        }

        if let Some(ref search) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(search))
                    .add(product::Column::Description.contains(search))
                    .add(product::Column::Brand.contains(search)),
            );
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(product::Column::IsActive.eq(is_active));
        }

        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .limit(filter.limit as u64)
            .offset(filter.offset as u64)
            .all(self.products.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let model = self
            .products
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::ProductNotFound(id))?;

        // Apply updates on the domain model, then write back
        let mut domain: Product = model.into();
        domain.apply_update(input);

        let active = product::ActiveModel {
            id: Set(domain.id),
            sub_category_id: Set(domain.sub_category_id),
            name: Set(domain.name.clone()),
            brand: Set(domain.brand.clone()),
            description: Set(domain.description.clone()),
            price: Set(domain.price),
            quantity: Set(domain.quantity),
            is_active: Set(domain.is_active),
            created_at: Set(domain.created_at.into()),
            updated_at: Set(domain.updated_at.into()),
            deleted_at: Set(domain.deleted_at.map(Into::into)),
        };

        let updated = self.products.update(active).await.map_err(db_err)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn set_product_active(&self, id: Uuid, is_active: bool) -> CatalogResult<Product> {
        let model = self
            .products
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut active: product::ActiveModel = model.into_active_model();
        active.is_active = Set(is_active);
        active.deleted_at = Set(if is_active {
            None
        } else {
            Some(Utc::now().into())
        });
        active.updated_at = Set(Utc::now().into());
        let updated = self.products.update(active).await.map_err(db_err)?;

        tracing::info!(product_id = %id, is_active, "Updated product status");
        Ok(updated.into())
    }
}
