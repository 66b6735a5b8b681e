//! `/leave` route group: submission, attachment upload, admin review, and
//! the per-request message thread (spec §4.6).

use axum::extract::{Multipart, Path, State};
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use db::models::leave_message::Sender;
use db::models::leave_request::{LeaveStatus, LeaveType};
use services::attachments::UploadedAttachment;
use services::leave_manager::{ReviewPatch, SubmissionInput};

use crate::api_error::into_response;
use crate::auth::claims::ActorContext;
use crate::auth::guards::require_reviewer;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Review is reviewer-only; submission, attachment upload, self-acknowledgement
/// and the message thread are open to any authenticated actor (ownership is
/// enforced inside `LeaveManager` itself).
pub fn leave_routes() -> Router<AppState> {
    let open = Router::new()
        .route("/", post(submit))
        .route("/{id}/attachment", put(upload_attachment))
        .route("/{id}/acknowledge-no-document", post(acknowledge_no_document))
        .route("/{id}/messages", get(messages_for).post(post_message));

    let reviewer_only = Router::new().route("/{id}/review", post(review)).route_layer(from_fn(require_reviewer));

    open.merge(reviewer_only)
}

#[derive(Deserialize)]
struct SubmitBody {
    teacher_id: i64,
    leave_type: LeaveType,
    reason: String,
    leave_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
}

/// POST /leave
///
/// Accepts `multipart/form-data` with a `payload` part holding the JSON body
/// above and an optional `attachment` file part, so a sickleave submission
/// can carry its document in the same request.
async fn submit(
    State(state): State<AppState>,
    actor: ActorContext,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let mut body: Option<SubmitBody> = None;
    let mut attachment: Option<UploadedAttachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        into_response(services::error::ServiceError::Validation(format!("malformed multipart body: {e}")))
    })? {
        match field.name().unwrap_or_default() {
            "payload" => {
                let bytes = field.bytes().await.map_err(|e| {
                    into_response(services::error::ServiceError::Validation(format!("failed to read payload: {e}")))
                })?;
                body = Some(serde_json::from_slice(&bytes).map_err(|e| {
                    into_response(services::error::ServiceError::Validation(format!("invalid payload JSON: {e}")))
                })?);
            }
            "attachment" => {
                let original_name = field.file_name().unwrap_or("attachment").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    into_response(services::error::ServiceError::Validation(format!("failed to read attachment: {e}")))
                })?;
                attachment = Some(UploadedAttachment {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let body = body.ok_or_else(|| {
        into_response(services::error::ServiceError::Validation("missing payload part".into()))
    })?;

    let input = SubmissionInput {
        teacher_id: body.teacher_id,
        leave_type: body.leave_type,
        reason: body.reason,
        leave_date: body.leave_date,
        end_date: body.end_date,
        start_time: body.start_time,
        end_time: body.end_time,
        attachment,
    };

    let leave = state.leave_manager.submit(&actor.tenant_id, input).await.map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&leave).unwrap_or_default(), "leave request submitted")))
}

/// PUT /leave/{id}/attachment
async fn upload_attachment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let teacher_id = actor.teacher_id.ok_or_else(|| {
        into_response(services::error::ServiceError::AuthRequired("teacher identity required".into()))
    })?;

    let mut attachment: Option<UploadedAttachment> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        into_response(services::error::ServiceError::Validation(format!("malformed multipart body: {e}")))
    })? {
        if field.name() == Some("attachment") {
            let original_name = field.file_name().unwrap_or("attachment").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                into_response(services::error::ServiceError::Validation(format!("failed to read attachment: {e}")))
            })?;
            attachment = Some(UploadedAttachment {
                original_name,
                bytes: bytes.to_vec(),
            });
        }
    }
    let attachment = attachment.ok_or_else(|| {
        into_response(services::error::ServiceError::Validation("missing attachment part".into()))
    })?;

    let leave = state
        .leave_manager
        .upload_attachment(&actor.tenant_id, id, teacher_id, attachment)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&leave).unwrap_or_default(), "attachment uploaded")))
}

/// POST /leave/{id}/acknowledge-no-document
async fn acknowledge_no_document(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let teacher_id = actor.teacher_id.ok_or_else(|| {
        into_response(services::error::ServiceError::AuthRequired("teacher identity required".into()))
    })?;
    let leave = state
        .leave_manager
        .acknowledge_no_document(&actor.tenant_id, teacher_id, id)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&leave).unwrap_or_default(), "acknowledged without document")))
}

#[derive(Deserialize)]
struct ReviewBody {
    status: LeaveStatus,
    admin_comment: Option<String>,
    attachment_override: Option<bool>,
}

/// POST /leave/{id}/review — restricted to reviewer roles by the
/// `require_reviewer` middleware nested onto this route group.
async fn review(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let patch = ReviewPatch {
        status: body.status,
        admin_comment: body.admin_comment,
        attachment_override: body.attachment_override,
    };
    let reviewer_name = format!("{:?}#{}", actor.role, actor.teacher_id.unwrap_or(0));
    let leave = state
        .leave_manager
        .review(&actor.tenant_id, actor.role.clone(), actor.teacher_id, &reviewer_name, id, patch)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&leave).unwrap_or_default(), "leave request reviewed")))
}

#[derive(Deserialize)]
struct PostMessageBody {
    body: String,
}

/// POST /leave/{id}/messages
async fn post_message(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    Json(body): Json<PostMessageBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let sender = if actor.can_review() { Sender::Admin } else { Sender::Teacher };
    let message = state
        .leave_manager
        .post_message(&actor.tenant_id, id, sender, body.body)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&message).unwrap_or_default(), "message posted")))
}

/// GET /leave/{id}/messages
async fn messages_for(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let messages = state.leave_manager.messages_for(&actor.tenant_id, id).await.map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&messages).unwrap_or_default(), "messages fetched")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_group_builds() {
        let _ = leave_routes();
    }
}
