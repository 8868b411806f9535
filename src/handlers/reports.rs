use crate::{
    errors::{ErrorResponse, ServiceError},
    handlers::common::{attachment_response, parse_record_id},
    reports::spreadsheet,
    services::reports::{WastageDetail, WastageSummaryItem},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_CONTENT_TYPE: &str = "application/pdf";

fn material_not_found() -> ServiceError {
    ServiceError::NotFound("Material not found".to_string())
}

/// Wastage per dispatch, recomputed from live batch data
#[utoipa::path(
    get,
    path = "/api/wastage-summary",
    tag = "Reports",
    responses(
        (status = 200, description = "One entry per dispatch", body = [WastageSummaryItem]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn wastage_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.reports.wastage_summary().await?;
    Ok(Json(summary))
}

/// Wastage breakdown of a single dispatch
#[utoipa::path(
    get,
    path = "/wastage/{materialId}",
    tag = "Reports",
    params(("materialId" = String, Path, description = "Dispatch id")),
    responses(
        (status = 200, description = "Wastage detail", body = WastageDetail),
        (status = 404, description = "Dispatch not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn wastage_detail(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let material_id = parse_record_id(&material_id).ok_or_else(material_not_found)?;
    let detail = state.services.reports.wastage_detail(material_id).await?;
    Ok(Json(detail))
}

/// Spreadsheet of every dispatch with its received total and wastage
#[utoipa::path(
    get,
    path = "/export/excel",
    tag = "Reports",
    responses(
        (status = 200, description = "xlsx workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Report generation failed", body = ErrorResponse)
    )
)]
pub async fn export_excel(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let bytes = state.services.reports.export_spreadsheet().await?;
    Ok(attachment_response(
        XLSX_CONTENT_TYPE,
        spreadsheet::FILE_NAME,
        bytes,
    ))
}

/// PDF report of one dispatch and its batch returns
#[utoipa::path(
    get,
    path = "/generate-pdf/{id}",
    tag = "Reports",
    params(("id" = String, Path, description = "Dispatch id")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Dispatch not found", body = ErrorResponse),
        (status = 500, description = "Report generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_record_id(&id).ok_or_else(material_not_found)?;
    let (file_name, bytes) = state.services.reports.export_pdf(id).await?;
    info!(dispatch_id = %id, file_name = %file_name, "Serving dispatch PDF");
    Ok(attachment_response(PDF_CONTENT_TYPE, &file_name, bytes))
}

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/api/wastage-summary", get(wastage_summary))
        .route("/wastage/:material_id", get(wastage_detail))
        .route("/export/excel", get(export_excel))
        .route("/generate-pdf/:id", get(generate_pdf))
}
