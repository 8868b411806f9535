use crate::{
    db::DbPool,
    errors::ServiceError,
    models::material_dispatch,
    services::{batch_returns, wastage},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, QueryOrder, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Fields accepted when dispatching material
#[derive(Debug, Clone)]
pub struct NewDispatch {
    pub material_name: String,
    pub to_company: String,
    pub given_quantity: f64,
    pub dispatch_date: Option<DateTime<Utc>>,
}

/// The four core fields, replaced together on update
#[derive(Debug, Clone)]
pub struct DispatchFields {
    pub material_name: String,
    pub to_company: String,
    pub given_quantity: f64,
    pub dispatch_date: DateTime<Utc>,
}

fn ensure_positive_quantity(given_quantity: f64) -> Result<(), ServiceError> {
    if given_quantity.is_finite() && given_quantity > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(
            "givenQuantity must be a positive number".to_string(),
        ))
    }
}

/// Service for managing material dispatches
#[derive(Clone)]
pub struct DispatchService {
    db_pool: Arc<DbPool>,
}

impl DispatchService {
    /// Creates a new dispatch service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records a new dispatch; wastage keeps its placeholder until the first recompute
    #[instrument(skip(self))]
    pub async fn create_dispatch(
        &self,
        input: NewDispatch,
    ) -> Result<material_dispatch::Model, ServiceError> {
        ensure_positive_quantity(input.given_quantity)?;
        let db = &*self.db_pool;

        let dispatch = material_dispatch::ActiveModel {
            id: Set(Uuid::new_v4()),
            material_name: Set(input.material_name),
            to_company: Set(input.to_company),
            given_quantity: Set(input.given_quantity),
            dispatch_date: input.dispatch_date.map(Set).unwrap_or(NotSet),
            ..Default::default()
        };

        let dispatch = dispatch.insert(db).await.map_err(|e| {
            error!("Failed to create dispatch: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(dispatch_id = %dispatch.id, "Material dispatched");
        Ok(dispatch)
    }

    /// Lists all dispatches ordered by dispatch date
    #[instrument(skip(self))]
    pub async fn list_dispatches(&self) -> Result<Vec<material_dispatch::Model>, ServiceError> {
        let db = &*self.db_pool;
        material_dispatch::Entity::find()
            .order_by_asc(material_dispatch::Column::DispatchDate)
            .order_by_asc(material_dispatch::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list dispatches: {}", e);
                ServiceError::DatabaseError(e)
            })
    }

    /// Gets a dispatch by ID
    #[instrument(skip(self))]
    pub async fn get_dispatch(
        &self,
        id: Uuid,
    ) -> Result<Option<material_dispatch::Model>, ServiceError> {
        let db = &*self.db_pool;
        material_dispatch::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Replaces the core fields, recomputes wastage and returns the refreshed record
    #[instrument(skip(self))]
    pub async fn update_dispatch(
        &self,
        id: Uuid,
        fields: DispatchFields,
    ) -> Result<material_dispatch::Model, ServiceError> {
        ensure_positive_quantity(fields.given_quantity)?;
        let db = &*self.db_pool;

        let existing = self
            .get_dispatch(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

        let mut active: material_dispatch::ActiveModel = existing.into();
        active.material_name = Set(fields.material_name);
        active.to_company = Set(fields.to_company);
        active.given_quantity = Set(fields.given_quantity);
        active.dispatch_date = Set(fields.dispatch_date);

        active.update(db).await.map_err(|e| {
            error!("Failed to update dispatch {}: {}", id, e);
            ServiceError::DatabaseError(e)
        })?;

        wastage::recompute_wastage(db, id).await?;

        let refreshed = self.get_dispatch(id).await?.ok_or_else(|| {
            warn!("Dispatch {} disappeared during update", id);
            ServiceError::NotFound("Material not found".to_string())
        })?;

        info!(dispatch_id = %id, wastage = %refreshed.wastage, "Material updated");
        Ok(refreshed)
    }

    /// Deletes a dispatch and all of its batch returns in one transaction
    #[instrument(skip(self))]
    pub async fn delete_dispatch(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let deleted = material_dispatch::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| {
                error!("Failed to delete dispatch {}: {}", id, e);
                ServiceError::DatabaseError(e)
            })?;

        if deleted.rows_affected == 0 {
            txn.rollback().await.map_err(ServiceError::DatabaseError)?;
            return Err(ServiceError::NotFound("Material not found".to_string()));
        }

        let batches = batch_returns::delete_by_material(&txn, id).await?;
        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(
            dispatch_id = %id,
            batch_returns_deleted = batches,
            "Material and associated batch returns deleted"
        );
        Ok(())
    }
}
