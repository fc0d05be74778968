//! Generic repository base for SeaORM entities keyed by UUID.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait,
};
use std::marker::PhantomData;
use uuid::Uuid;

/// Shared CRUD plumbing for repositories over a single entity.
///
/// Domain repositories wrap this for the common operations and add their own
/// filtered queries on top via [`BaseRepository::db`].
///
/// # Example
/// ```ignore
/// pub struct PgProductRepository {
///     base: BaseRepository<entity::product::Entity>,
/// }
/// ```
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Access the underlying connection for entity-specific queries.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a new row and return the persisted model.
    pub async fn insert(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.insert(&self.db).await
    }

    /// Find a row by its UUID primary key.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// Update an existing row and return the persisted model.
    pub async fn update(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.update(&self.db).await
    }

    /// Delete a row by its UUID primary key, returning the affected row count.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}
