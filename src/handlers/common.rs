use crate::{errors::ServiceError, services::batch_returns::DateRange};
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// File download with an attachment `Content-Disposition`
pub fn attachment_response(
    content_type: &'static str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

/// Unwraps a JSON body, turning extractor rejections into 400s
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServiceError::BadRequest(rejection.body_text()))
}

/// Path ids that are not UUIDs cannot match any record
pub fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Custom validator: text must contain something other than whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Custom validator: strictly positive, finite quantity
pub fn validate_positive_quantity(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        let mut err = ValidationError::new("positive_quantity");
        err.message = Some("must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

/// Custom validator: non-negative, finite quantity
pub fn validate_non_negative_quantity(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        let mut err = ValidationError::new("non_negative_quantity");
        err.message = Some("must be a non-negative number".into());
        return Err(err);
    }
    Ok(())
}

/// How a plain `YYYY-MM-DD` value is widened to an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

impl DayBound {
    fn time(self) -> NaiveTime {
        match self {
            DayBound::Start => NaiveTime::MIN,
            DayBound::End => {
                NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
            }
        }
    }
}

/// Parses RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC) or `YYYY-MM-DD`
pub fn parse_date(
    raw: &str,
    field: &str,
    bound: DayBound,
) -> Result<DateTime<Utc>, ServiceError> {
    let value = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(bound.time()).and_utc());
    }

    Err(ServiceError::ValidationError(format!(
        "Invalid {}: expected an RFC 3339 timestamp or YYYY-MM-DD",
        field
    )))
}

/// Optional `?startDate=&endDate=` filter, both bounds inclusive.
///
/// Either bound may be given alone. A date-only `endDate` covers that whole day,
/// up to 23:59:59.999, rather than stopping at midnight.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    /// Earliest receivedDate to include
    pub start_date: Option<String>,
    /// Latest receivedDate to include; a plain date covers the whole day
    pub end_date: Option<String>,
}

impl DateRangeParams {
    /// Converts the raw query values into a validated range
    pub fn to_date_range(&self) -> Result<DateRange, ServiceError> {
        let start = non_empty(&self.start_date)
            .map(|raw| parse_date(raw, "startDate", DayBound::Start))
            .transpose()?;
        let end = non_empty(&self.end_date)
            .map(|raw| parse_date(raw, "endDate", DayBound::End))
            .transpose()?;
        DateRange::new(start, end)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
