//! `/cover` route group: viewing and editing cover assignments, plus the
//! admin backfill action (spec §4.7).

use axum::extract::{Path, Query, State};
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use db::repositories::cover_assignment_repository::CoverAssignmentFilter;
use db::repositories::repository::Repository;
use services::cover_engine::CoverAssignmentPatch;

use crate::api_error::into_response;
use crate::auth::claims::ActorContext;
use crate::auth::guards::require_reviewer;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Reading the roster is open to any authenticated actor; editing it and
/// backfill are reviewer-only.
pub fn cover_routes() -> Router<AppState> {
    let reads = Router::new().route("/", get(list_assignments));

    let writes = Router::new()
        .route("/{id}", put(edit_assignment))
        .route("/backfill", post(backfill))
        .route_layer(from_fn(require_reviewer));

    reads.merge(writes)
}

#[derive(Deserialize)]
struct ListQuery {
    date: Option<NaiveDate>,
    request_id: Option<String>,
}

/// GET /cover?date=&request_id=
async fn list_assignments(
    State(state): State<AppState>,
    actor: ActorContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let repo = db::repositories::cover_assignment_repository::CoverAssignmentRepository::new(state.db.clone());
    let filter = CoverAssignmentFilter {
        tenant_id: Some(actor.tenant_id.clone()),
        date: query.date,
        request_id: query.request_id,
        slot_key: None,
    };
    let rows = repo.find_all(filter).await.map_err(|e| into_response(e.into()))?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&rows).unwrap_or_default(), "cover assignments fetched")))
}

#[derive(Deserialize, Default)]
struct EditBody {
    status: Option<String>,
    cover_teacher: Option<String>,
    cover_email: Option<String>,
    cover_slug: Option<String>,
    class_subject: Option<String>,
    class_grade: Option<String>,
    class_details: Option<String>,
    period_label: Option<String>,
    period_raw: Option<String>,
    class_time: Option<String>,
}

/// PUT /cover/{id} — reviewer-only, enforced by `require_reviewer` on this
/// route group's nest.
async fn edit_assignment(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    Json(body): Json<EditBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let patch = CoverAssignmentPatch {
        status: body.status,
        cover_teacher: body.cover_teacher,
        cover_email: body.cover_email,
        cover_slug: body.cover_slug,
        class_subject: body.class_subject,
        class_grade: body.class_grade,
        class_details: body.class_details,
        period_label: body.period_label,
        period_raw: body.period_raw,
        class_time: body.class_time,
    };
    let row = state
        .cover_engine
        .edit_assignment(&actor.tenant_id, id, patch)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&row).unwrap_or_default(), "cover assignment updated")))
}

/// POST /cover/backfill — reviewer-only, reruns assignment for every
/// approved leave with no cover rows yet.
async fn backfill(
    State(state): State<AppState>,
    actor: ActorContext,
) -> Result<Json<ApiResponse<serde_json::Value>>, (axum::http::StatusCode, Json<ApiResponse<()>>)> {
    let created = state.cover_engine.backfill(&actor.tenant_id).await.map_err(into_response)?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "created": created }),
        "backfill complete",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_group_builds() {
        let _ = cover_routes();
    }
}
