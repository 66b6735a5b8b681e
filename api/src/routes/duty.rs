//! `/duty` route group: daily-duty and grade-pod-duty rosters,
//! acknowledgements, bulk roster replace, and availability candidates
//! (spec §4.8).

use axum::extract::{Path, Query, State};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use db::models::duty_acknowledgement::AckStatus;
use db::models::duty_assignment::DutyType;
use db::models::pod_duty_assignment::SlotType;
use db::models::schedule_entry::DayCode;
use db::repositories::duty_assignment_repository::DutyAssignmentFilter;
use db::repositories::pod_duty_assignment_repository::PodDutyAssignmentFilter;
use db::repositories::repository::Repository;
use services::duty_scheduler::PodSlotInput;

use crate::api_error::into_response;
use crate::auth::claims::ActorContext;
use crate::auth::guards::require_reviewer;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, (axum::http::StatusCode, Json<ApiResponse<()>>)>;

/// Read-only endpoints and the acknowledgement endpoints (open to any
/// authenticated actor, since an admin or the assigned teacher may
/// acknowledge their own duty — `DutyScheduler` enforces the ownership
/// check), merged with reviewer-only roster mutations behind
/// `require_reviewer`.
pub fn duty_routes() -> Router<AppState> {
    let open = Router::new()
        .route("/daily", get(list_daily))
        .route("/pod", get(list_pod))
        .route("/availability", get(availability_candidates))
        .route("/daily/{id}/acknowledge", post(acknowledge_daily))
        .route("/pod/{id}/acknowledge", post(acknowledge_pod));

    let writes = Router::new()
        .route("/daily", post(assign_daily))
        .route("/pod", post(assign_pod_slot))
        .route("/pod/bulk", post(bulk_replace_pod))
        .route_layer(from_fn(require_reviewer));

    open.merge(writes)
}

#[derive(Deserialize)]
struct DailyQuery {
    date: Option<NaiveDate>,
}

/// GET /duty/daily?date=
async fn list_daily(
    State(state): State<AppState>,
    actor: ActorContext,
    Query(query): Query<DailyQuery>,
) -> ApiResult<serde_json::Value> {
    let repo = db::repositories::duty_assignment_repository::DutyAssignmentRepository::new(state.db.clone());
    let filter = DutyAssignmentFilter {
        tenant_id: Some(actor.tenant_id.clone()),
        assignment_date: query.date,
        duty_type: None,
        teacher_id: None,
    };
    let rows = repo.find_all(filter).await.map_err(|e| into_response(e.into()))?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&rows).unwrap_or_default(), "daily duty roster fetched")))
}

#[derive(Deserialize)]
struct AssignDailyBody {
    date: NaiveDate,
    duty_type: DutyType,
    location: String,
    teacher_id: i64,
}

/// POST /duty/daily — reviewer-only, enforced by `require_reviewer` on this
/// route group's nest.
async fn assign_daily(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(body): Json<AssignDailyBody>,
) -> ApiResult<serde_json::Value> {
    let row = state
        .duty_scheduler
        .assign_daily(&actor.tenant_id, body.date, body.duty_type, &body.location, body.teacher_id)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&row).unwrap_or_default(), "daily duty assigned")))
}

#[derive(Deserialize)]
struct AcknowledgeBody {
    status: AckStatus,
    note: Option<String>,
}

/// POST /duty/daily/{id}/acknowledge — open to any authenticated actor;
/// `DutyScheduler` rejects anyone but an admin or the assigned teacher.
async fn acknowledge_daily(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    Json(body): Json<AcknowledgeBody>,
) -> ApiResult<serde_json::Value> {
    let ack = state
        .duty_scheduler
        .acknowledge_daily(id, &actor.role, actor.teacher_id, body.status, body.note)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&ack).unwrap_or_default(), "daily duty acknowledged")))
}

#[derive(Deserialize)]
struct PodQuery {
    date: Option<NaiveDate>,
    grade: Option<i32>,
}

/// GET /duty/pod?date=&grade=
async fn list_pod(
    State(state): State<AppState>,
    actor: ActorContext,
    Query(query): Query<PodQuery>,
) -> ApiResult<serde_json::Value> {
    let repo = db::repositories::pod_duty_assignment_repository::PodDutyAssignmentRepository::new(state.db.clone());
    let filter = PodDutyAssignmentFilter {
        tenant_id: Some(actor.tenant_id.clone()),
        assignment_date: query.date,
        grade: query.grade,
        slot_type: None,
        teacher_id: None,
    };
    let rows = repo.find_all(filter).await.map_err(|e| into_response(e.into()))?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&rows).unwrap_or_default(), "pod duty roster fetched")))
}

#[derive(Deserialize)]
struct PodSlotBody {
    date: NaiveDate,
    grade: i32,
    pod: String,
    slot_type: SlotType,
    period: Option<i32>,
    teacher_id: i64,
    break_location: Option<String>,
}

impl From<PodSlotBody> for PodSlotInput {
    fn from(body: PodSlotBody) -> Self {
        PodSlotInput {
            date: body.date,
            grade: body.grade,
            pod: body.pod,
            slot_type: body.slot_type,
            period: body.period,
            teacher_id: body.teacher_id,
            break_location: body.break_location,
        }
    }
}

/// POST /duty/pod — reviewer-only. A grade-lead may only manage their own
/// grade's pod roster; enforced here since it depends on the request body's
/// `grade`, not just the route.
async fn assign_pod_slot(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(body): Json<PodSlotBody>,
) -> ApiResult<serde_json::Value> {
    if !services::duty_scheduler::can_edit_pod_roster(&actor.role, body.grade) {
        return Err(into_response(services::error::ServiceError::Validation(format!(
            "{} may not edit the grade {} pod roster",
            actor.role, body.grade
        ))));
    }
    let row = state
        .duty_scheduler
        .assign_pod_slot(&actor.tenant_id, body.into())
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&row).unwrap_or_default(), "pod duty slot assigned")))
}

/// POST /duty/pod/{id}/acknowledge — open to any authenticated actor;
/// `DutyScheduler` rejects anyone but an admin or the assigned teacher.
async fn acknowledge_pod(
    State(state): State<AppState>,
    actor: ActorContext,
    Path(id): Path<i64>,
    Json(body): Json<AcknowledgeBody>,
) -> ApiResult<serde_json::Value> {
    let ack = state
        .duty_scheduler
        .acknowledge_pod(id, &actor.role, actor.teacher_id, body.status, body.note)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&ack).unwrap_or_default(), "pod duty acknowledged")))
}

#[derive(Deserialize)]
struct BulkReplaceBody {
    date: NaiveDate,
    grade: i32,
    desired: Vec<PodSlotBody>,
}

/// POST /duty/pod/bulk — reviewer-only, restricted to the grade's own lead
/// (or super admin) the same way `assign_pod_slot` is.
async fn bulk_replace_pod(
    State(state): State<AppState>,
    actor: ActorContext,
    Json(body): Json<BulkReplaceBody>,
) -> ApiResult<serde_json::Value> {
    if !services::duty_scheduler::can_edit_pod_roster(&actor.role, body.grade) {
        return Err(into_response(services::error::ServiceError::Validation(format!(
            "{} may not edit the grade {} pod roster",
            actor.role, body.grade
        ))));
    }
    let desired: Vec<PodSlotInput> = body.desired.into_iter().map(Into::into).collect();
    let diff = state
        .duty_scheduler
        .bulk_replace_pod(&actor.tenant_id, body.date, body.grade, desired)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "added": diff.added, "removed": diff.removed, "rejected": diff.rejected }),
        "pod roster replaced",
    )))
}

#[derive(Deserialize)]
struct AvailabilityQuery {
    date: NaiveDate,
    day: DayCode,
    period: String,
    slot_type: SlotType,
}

/// GET /duty/availability?date=&day=&period=&slot_type=
async fn availability_candidates(
    State(state): State<AppState>,
    actor: ActorContext,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<serde_json::Value> {
    let candidates = state
        .duty_scheduler
        .availability_candidates(&actor.tenant_id, query.date, query.day, &query.period, query.slot_type)
        .await
        .map_err(into_response)?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&candidates).unwrap_or_default(), "availability candidates fetched")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_group_builds() {
        let _ = duty_routes();
    }
}
