use crate::{
    errors::{ErrorResponse, ServiceError},
    handlers::common::{
        created_response, json_body, parse_date, parse_record_id, success_response,
        validate_input, validate_not_blank, validate_positive_quantity, DayBound,
    },
    models::material_dispatch,
    services::dispatches::{DispatchFields, NewDispatch},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

/// Body of `POST /materials`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialRequest {
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "Steel")]
    pub material_name: String,
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "Acme")]
    pub to_company: String,
    #[validate(custom = "validate_positive_quantity")]
    #[schema(example = 100.0)]
    pub given_quantity: f64,
    /// Defaults to now
    #[schema(example = "2024-01-01T10:00:00Z")]
    pub dispatch_date: Option<String>,
}

/// Body of `PUT /materials/:id`; every field is required
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    pub material_name: Option<String>,
    pub to_company: Option<String>,
    pub given_quantity: Option<f64>,
    pub dispatch_date: Option<String>,
}

impl UpdateMaterialRequest {
    /// All four core fields, or a 400 when any is missing or empty
    pub fn into_fields(self) -> Result<DispatchFields, ServiceError> {
        let missing = || ServiceError::BadRequest("All fields are required".to_string());
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let material_name = present(self.material_name).ok_or_else(missing)?;
        let to_company = present(self.to_company).ok_or_else(missing)?;
        let given_quantity = self.given_quantity.ok_or_else(missing)?;
        let dispatch_date = present(self.dispatch_date).ok_or_else(missing)?;

        validate_positive_quantity(given_quantity).map_err(|_| {
            ServiceError::ValidationError("givenQuantity must be a positive number".to_string())
        })?;

        Ok(DispatchFields {
            material_name,
            to_company,
            given_quantity,
            dispatch_date: parse_date(&dispatch_date, "dispatchDate", DayBound::Start)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DispatchCreatedResponse {
    #[schema(example = "Material dispatched successfully")]
    pub message: String,
    pub dispatch: material_dispatch::Model,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchUpdatedResponse {
    #[schema(example = "Material updated successfully")]
    pub message: String,
    pub updated_material: material_dispatch::Model,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List all material dispatches
#[utoipa::path(
    get,
    path = "/materials",
    tag = "Materials",
    responses(
        (status = 200, description = "All dispatches", body = [material_dispatch::Model]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_materials(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let dispatches = state.services.dispatches.list_dispatches().await?;
    Ok(Json(dispatches))
}

/// Dispatch material to a company
#[utoipa::path(
    post,
    path = "/materials",
    tag = "Materials",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Dispatch recorded", body = DispatchCreatedResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_material(
    State(state): State<AppState>,
    payload: Result<Json<CreateMaterialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let dispatch_date = payload
        .dispatch_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(raw, "dispatchDate", DayBound::Start))
        .transpose()?;

    let dispatch = state
        .services
        .dispatches
        .create_dispatch(NewDispatch {
            material_name: payload.material_name,
            to_company: payload.to_company,
            given_quantity: payload.given_quantity,
            dispatch_date,
        })
        .await?;

    Ok(created_response(DispatchCreatedResponse {
        message: "Material dispatched successfully".to_string(),
        dispatch,
    }))
}

/// Replace the four core fields of a dispatch and recompute its wastage
#[utoipa::path(
    put,
    path = "/materials/{id}",
    tag = "Materials",
    params(("id" = String, Path, description = "Dispatch id")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Dispatch updated", body = DispatchUpdatedResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 404, description = "Dispatch not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMaterialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let fields = json_body(payload)?.into_fields()?;
    let id = parse_record_id(&id)
        .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

    let updated_material = state
        .services
        .dispatches
        .update_dispatch(id, fields)
        .await?;

    Ok(success_response(DispatchUpdatedResponse {
        message: "Material updated successfully".to_string(),
        updated_material,
    }))
}

/// Delete a dispatch together with its batch returns
#[utoipa::path(
    delete,
    path = "/materials/{id}",
    tag = "Materials",
    params(("id" = String, Path, description = "Dispatch id")),
    responses(
        (status = 200, description = "Dispatch and batches deleted", body = MessageResponse),
        (status = 404, description = "Dispatch not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_record_id(&id)
        .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

    state.services.dispatches.delete_dispatch(id).await?;
    info!(dispatch_id = %id, "Deleted material via API");

    Ok(success_response(MessageResponse {
        message: "Material and associated batch returns deleted successfully".to_string(),
    }))
}

pub fn materials_routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route("/materials/:id", put(update_material).delete(delete_material))
}
