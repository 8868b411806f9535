use crate::{
    db::DbPool,
    errors::ServiceError,
    models::batch_return,
    services::wastage,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Inclusive bounds on `receivedDate`; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, ServiceError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ServiceError::ValidationError(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }
        Ok(Self { start, end })
    }
}

/// Fields accepted when logging a batch return
#[derive(Debug, Clone)]
pub struct NewBatchReturn {
    pub material_id: Uuid,
    pub received_quantity: f64,
    pub received_date: Option<DateTime<Utc>>,
}

/// Removes every batch referencing `material_id`; used by the dispatch cascade
pub async fn delete_by_material<C>(conn: &C, material_id: Uuid) -> Result<u64, ServiceError>
where
    C: ConnectionTrait,
{
    let result = batch_return::Entity::delete_many()
        .filter(batch_return::Column::MaterialId.eq(material_id))
        .exec(conn)
        .await
        .map_err(|e| {
            error!("Failed to delete batch returns for {}: {}", material_id, e);
            ServiceError::DatabaseError(e)
        })?;
    debug!(
        "Deleted {} batch returns for {}",
        result.rows_affected, material_id
    );
    Ok(result.rows_affected)
}

/// Service for managing batch returns
#[derive(Clone)]
pub struct BatchReturnService {
    db_pool: Arc<DbPool>,
}

impl BatchReturnService {
    /// Creates a new batch return service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Logs a batch return, then recomputes the parent dispatch's wastage
    #[instrument(skip(self))]
    pub async fn create_batch_return(
        &self,
        input: NewBatchReturn,
    ) -> Result<batch_return::Model, ServiceError> {
        if !input.received_quantity.is_finite() || input.received_quantity < 0.0 {
            return Err(ServiceError::ValidationError(
                "receivedQuantity must be a non-negative number".to_string(),
            ));
        }
        let db = &*self.db_pool;

        let batch = batch_return::ActiveModel {
            id: Set(Uuid::new_v4()),
            material_id: Set(input.material_id),
            received_quantity: Set(input.received_quantity),
            received_date: input.received_date.map(Set).unwrap_or(NotSet),
            ..Default::default()
        };

        let batch = batch.insert(db).await.map_err(|e| {
            error!("Failed to save batch return: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        wastage::recompute_wastage(db, batch.material_id).await?;

        info!(
            batch_id = %batch.id,
            material_id = %batch.material_id,
            "Batch return saved"
        );
        Ok(batch)
    }

    /// Batches for one dispatch within `range`, ordered by received date
    #[instrument(skip(self))]
    pub async fn find_by_material(
        &self,
        material_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<batch_return::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut query =
            batch_return::Entity::find().filter(batch_return::Column::MaterialId.eq(material_id));

        if let Some(start) = range.start {
            query = query.filter(batch_return::Column::ReceivedDate.gte(start));
        }
        if let Some(end) = range.end {
            query = query.filter(batch_return::Column::ReceivedDate.lte(end));
        }

        query
            .order_by_asc(batch_return::Column::ReceivedDate)
            .order_by_asc(batch_return::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to fetch batch returns for {}: {}", material_id, e);
                ServiceError::DatabaseError(e)
            })
    }
}
