use axum::http::StatusCode;
use axum::Json;
use services::error::ServiceError;

use crate::response::ApiResponse;

/// Maps a `ServiceError` onto the HTTP status spec §7 assigns its kind, and
/// wraps the message in the standard envelope. Every handler that calls into
/// `services` routes its `Result::Err` through this.
pub fn into_response(err: ServiceError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::AuthRequired(_) => StatusCode::UNAUTHORIZED,
        ServiceError::ConflictDuplicate(_) => StatusCode::CONFLICT,
        ServiceError::TransientIo(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
