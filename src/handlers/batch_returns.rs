use crate::{
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, json_body, parse_date, parse_record_id, validate_input,
        validate_non_negative_quantity, DateRangeParams, DayBound,
    },
    models::batch_return,
    services::batch_returns::NewBatchReturn,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /batch-return`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchReturnRequest {
    /// Dispatch the batch is returned against
    pub material_id: Uuid,
    #[validate(custom = "validate_non_negative_quantity")]
    #[schema(example = 40.0)]
    pub received_quantity: f64,
    /// Defaults to now
    #[schema(example = "2024-02-10")]
    pub received_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchCreatedResponse {
    #[schema(example = "Batch return saved successfully")]
    pub message: String,
    pub batch: batch_return::Model,
}

/// Log a batch return and recompute the dispatch's wastage
#[utoipa::path(
    post,
    path = "/batch-return",
    tag = "Batch Returns",
    request_body = CreateBatchReturnRequest,
    responses(
        (status = 201, description = "Batch saved", body = BatchCreatedResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_batch_return(
    State(state): State<AppState>,
    payload: Result<Json<CreateBatchReturnRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let received_date = payload
        .received_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(raw, "receivedDate", DayBound::Start))
        .transpose()?;

    let batch = state
        .services
        .batch_returns
        .create_batch_return(NewBatchReturn {
            material_id: payload.material_id,
            received_quantity: payload.received_quantity,
            received_date,
        })
        .await?;

    Ok(created_response(BatchCreatedResponse {
        message: "Batch return saved successfully".to_string(),
        batch,
    }))
}

/// Batch returns of one dispatch, optionally limited to a date range
#[utoipa::path(
    get,
    path = "/batch-returns/{materialId}",
    tag = "Batch Returns",
    params(
        ("materialId" = String, Path, description = "Dispatch id"),
        DateRangeParams
    ),
    responses(
        (status = 200, description = "Matching batches ordered by receivedDate", body = [batch_return::Model]),
        (status = 400, description = "Unparseable or inverted date range", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_batch_returns(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
    Query(params): Query<DateRangeParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let range = params.to_date_range()?;

    let Some(material_id) = parse_record_id(&material_id) else {
        return Ok(Json(Vec::<batch_return::Model>::new()));
    };

    let batches = state
        .services
        .batch_returns
        .find_by_material(material_id, range)
        .await?;
    Ok(Json(batches))
}

pub fn batch_returns_routes() -> Router<AppState> {
    Router::new()
        .route("/batch-return", post(create_batch_return))
        .route("/batch-returns/:material_id", get(list_batch_returns))
}
