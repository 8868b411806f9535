use crate::{
    db::DbPool,
    errors::ServiceError,
    models::{batch_return, material_dispatch},
    services::wastage,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// One entry of the wastage summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WastageSummaryItem {
    pub product_name: String,
    /// Rounded to two decimals; null when the dispatched quantity is not positive
    pub wastage_amount: Option<f64>,
}

/// Wastage breakdown for a single dispatch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WastageDetail {
    pub material_name: String,
    pub to_company: String,
    pub given_quantity: f64,
    pub total_received: f64,
    #[schema(example = "25.00")]
    pub wastage_percentage: Option<String>,
}

/// Spreadsheet row
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReportRow {
    pub material_name: String,
    pub to_company: String,
    pub given_quantity: f64,
    pub received_quantity: f64,
    pub wastage: Option<String>,
    pub dispatch_date: DateTime<Utc>,
}

/// Everything the PDF report prints for one dispatch
#[derive(Debug, Clone)]
pub struct DispatchDocument {
    pub dispatch: material_dispatch::Model,
    pub batches: Vec<batch_return::Model>,
    pub total_received: f64,
    pub wastage: Option<String>,
}

/// Read-side reporting; every figure is recomputed from live batch data
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    /// Creates a new report service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    async fn dispatches_with_batches(
        &self,
    ) -> Result<Vec<(material_dispatch::Model, Vec<batch_return::Model>)>, ServiceError> {
        let db = &*self.db_pool;
        let dispatches = material_dispatch::Entity::find()
            .order_by_asc(material_dispatch::Column::DispatchDate)
            .order_by_asc(material_dispatch::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to load dispatches for report: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        let batches = batch_return::Entity::find()
            .order_by_asc(batch_return::Column::ReceivedDate)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to load batch returns for report: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        let mut by_material: HashMap<Uuid, Vec<batch_return::Model>> = HashMap::new();
        for batch in batches {
            by_material.entry(batch.material_id).or_default().push(batch);
        }

        Ok(dispatches
            .into_iter()
            .map(|dispatch| {
                let batches = by_material.remove(&dispatch.id).unwrap_or_default();
                (dispatch, batches)
            })
            .collect())
    }

    async fn dispatch_with_batches(
        &self,
        id: Uuid,
    ) -> Result<(material_dispatch::Model, Vec<batch_return::Model>), ServiceError> {
        let db = &*self.db_pool;
        let dispatch = material_dispatch::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

        let batches = batch_return::Entity::find()
            .filter(batch_return::Column::MaterialId.eq(id))
            .order_by_asc(batch_return::Column::ReceivedDate)
            .order_by_asc(batch_return::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to load batch returns for {}: {}", id, e);
                ServiceError::DatabaseError(e)
            })?;

        Ok((dispatch, batches))
    }

    /// `{productName, wastageAmount}` per dispatch
    #[instrument(skip(self))]
    pub async fn wastage_summary(&self) -> Result<Vec<WastageSummaryItem>, ServiceError> {
        let summary: Vec<_> = self
            .dispatches_with_batches()
            .await?
            .into_iter()
            .map(|(dispatch, batches)| WastageSummaryItem {
                wastage_amount: wastage::wastage_percentage(
                    dispatch.given_quantity,
                    wastage::total_received(&batches),
                )
                .map(wastage::rounded_percentage),
                product_name: dispatch.material_name,
            })
            .collect();

        info!(entries = summary.len(), "Computed wastage summary");
        Ok(summary)
    }

    /// Wastage figures for a single dispatch
    #[instrument(skip(self))]
    pub async fn wastage_detail(&self, id: Uuid) -> Result<WastageDetail, ServiceError> {
        let (dispatch, batches) = self.dispatch_with_batches(id).await?;
        let total_received = wastage::total_received(&batches);

        Ok(WastageDetail {
            wastage_percentage: wastage::dispatch_wastage(&dispatch, &batches),
            material_name: dispatch.material_name,
            to_company: dispatch.to_company,
            given_quantity: dispatch.given_quantity,
            total_received,
        })
    }

    /// One row per dispatch for the spreadsheet export
    #[instrument(skip(self))]
    pub async fn dispatch_rows(&self) -> Result<Vec<DispatchReportRow>, ServiceError> {
        Ok(self
            .dispatches_with_batches()
            .await?
            .into_iter()
            .map(|(dispatch, batches)| DispatchReportRow {
                wastage: wastage::dispatch_wastage(&dispatch, &batches),
                received_quantity: wastage::total_received(&batches),
                material_name: dispatch.material_name,
                to_company: dispatch.to_company,
                given_quantity: dispatch.given_quantity,
                dispatch_date: dispatch.dispatch_date,
            })
            .collect())
    }

    /// The dispatch and its batches for the PDF export
    #[instrument(skip(self))]
    pub async fn dispatch_document(&self, id: Uuid) -> Result<DispatchDocument, ServiceError> {
        let (dispatch, batches) = self.dispatch_with_batches(id).await?;
        Ok(DispatchDocument {
            total_received: wastage::total_received(&batches),
            wastage: wastage::dispatch_wastage(&dispatch, &batches),
            dispatch,
            batches,
        })
    }

    /// Renders all dispatches into an xlsx workbook
    #[instrument(skip(self))]
    pub async fn export_spreadsheet(&self) -> Result<Vec<u8>, ServiceError> {
        let rows = self.dispatch_rows().await?;
        let bytes = crate::reports::spreadsheet::render_wastage_workbook(&rows)?;
        counter!("material_wastage.reports.generated", 1, "format" => "xlsx");
        info!(rows = rows.len(), size = bytes.len(), "Generated wastage spreadsheet");
        Ok(bytes)
    }

    /// Renders one dispatch into a PDF, returning the download file name and bytes
    #[instrument(skip(self))]
    pub async fn export_pdf(&self, id: Uuid) -> Result<(String, Vec<u8>), ServiceError> {
        let document = self.dispatch_document(id).await?;
        let bytes = crate::reports::pdf::render_dispatch_pdf(&document)?;
        let file_name = crate::reports::pdf::report_file_name(
            &document.dispatch.material_name,
            Utc::now(),
        );
        counter!("material_wastage.reports.generated", 1, "format" => "pdf");
        info!(size = bytes.len(), file_name = %file_name, "Generated dispatch PDF");
        Ok((file_name, bytes))
    }
}
