use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use domain_catalog::entity::product;

use crate::{
    entity::{delivery_address, order, order_item},
    error::{OrderError, OrderResult},
    models::{NewOrder, Order, OrderDetails, OrderStatus},
    repository::{OrderRepository, sorted_unique_items},
};

fn db_err(e: sea_orm::DbErr) -> OrderError {
    OrderError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of OrderRepository.
///
/// Placement runs in one transaction with `SELECT ... FOR UPDATE` on every
/// product row being decremented, so two concurrent orders cannot both pass
/// the stock check against a stale read.
pub struct PgOrderRepository {
    base: BaseRepository<order::Entity>,
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            db,
        }
    }

    async fn place_in_txn(
        txn: &DatabaseTransaction,
        input: NewOrder,
    ) -> OrderResult<OrderDetails> {
        // Items arrive sorted by product ID; locking in that stable order
        // prevents deadlocks between concurrent orders
        let items = sorted_unique_items(&input.items)?;

        let order_model = order::ActiveModel::new_pending(input.buyer_id)
            .insert(txn)
            .await
            .map_err(db_err)?;
        let order_id = order_model.id;

        let mut item_models = Vec::with_capacity(items.len());
        for item in &items {
            // Row lock: the stock check and decrement must see the same value
            let product_model = product::Entity::find_by_id(item.product)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(db_err)?
                .ok_or(OrderError::ProductNotFound(item.product))?;

            if !product_model.is_active {
                return Err(OrderError::Validation(format!(
                    "Product '{}' is not available",
                    product_model.name
                )));
            }

            if item.quantity > product_model.quantity {
                return Err(OrderError::Validation(format!(
                    "Ordered quantity exceeds stock for product '{}'",
                    product_model.name
                )));
            }

            let unit_price = product_model.price;
            let remaining = product_model.quantity - item.quantity;

            let mut product_active = product_model.into_active_model();
            product_active.quantity = Set(remaining);
            product_active.updated_at = Set(Utc::now().into());
            product_active.update(txn).await.map_err(db_err)?;

            let item_model =
                order_item::ActiveModel::for_order(order_id, item.product, item.quantity, unit_price)
                    .insert(txn)
                    .await
                    .map_err(db_err)?;
            item_models.push(item_model);
        }

        let address_model = delivery_address::ActiveModel::for_order(order_id, input.address)
            .insert(txn)
            .await
            .map_err(db_err)?;

        Ok(OrderDetails::new(
            order_model.into(),
            item_models.into_iter().map(Into::into).collect(),
            address_model.into(),
        ))
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn place(&self, input: NewOrder) -> OrderResult<OrderDetails> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match Self::place_in_txn(&txn, input).await {
            Ok(details) => {
                txn.commit().await.map_err(db_err)?;
                tracing::info!(
                    order_id = %details.order.id,
                    buyer_id = %details.order.buyer_id,
                    items = details.order_items.len(),
                    "Placed order"
                );
                Ok(details)
            }
            Err(e) => {
                // Roll back everything: no partial orders, no partially
                // decremented inventory
                txn.rollback().await.ok();
                Err(e)
            }
        }
    }

    async fn order_by_id(&self, id: Uuid) -> OrderResult<Option<OrderDetails>> {
        let Some(order_model) = self.base.find_by_id(id).await.map_err(db_err)? else {
            return Ok(None);
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        let address = delivery_address::Entity::find()
            .filter(delivery_address::Column::OrderId.eq(id))
            .one(self.base.db())
            .await
            .map_err(db_err)?
            .ok_or_else(|| OrderError::Internal(format!("Order {} has no address", id)))?;

        Ok(Some(OrderDetails::new(
            order_model.into(),
            items.into_iter().map(Into::into).collect(),
            address.into(),
        )))
    }

    async fn list_for_buyer(&self, buyer_id: Uuid) -> OrderResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::BuyerId.eq(buyer_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(OrderError::OrderNotFound(id))?;

        let mut active = model.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        let updated = self.base.update(active).await.map_err(db_err)?;

        tracing::info!(order_id = %id, status = %status, "Updated order status");
        Ok(updated.into())
    }
}
