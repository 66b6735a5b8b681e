//! `/notifier` route group: OAuth device-flow administration for the
//! email/drive notifier profiles (spec §4.5). Reviewer-only, since it
//! manages shared tenant-wide credentials rather than per-teacher data.

use axum::extract::{Path, State};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::api_error::into_response;
use crate::auth::claims::ActorContext;
use crate::auth::guards::require_reviewer;
use crate::response::ApiResponse;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, (axum::http::StatusCode, Json<ApiResponse<()>>)>;

pub fn notifier_routes() -> Router<AppState> {
    Router::new()
        .route("/flows", get(list_flows))
        .route("/flows/{profile}/start", post(start_device_flow))
        .route("/flows/{profile}/logout", post(logout))
        .route_layer(from_fn(require_reviewer))
}

#[derive(Serialize)]
struct DeviceFlowDto {
    profile: String,
    user_code: String,
    verification_uri: String,
    status: String,
}

impl From<&services::notifier::DeviceFlow> for DeviceFlowDto {
    fn from(flow: &services::notifier::DeviceFlow) -> Self {
        let status = match flow.status {
            services::notifier::DeviceFlowStatus::Pending => "pending",
            services::notifier::DeviceFlowStatus::Completed => "completed",
            services::notifier::DeviceFlowStatus::Expired => "expired",
        };
        DeviceFlowDto {
            profile: flow.profile.clone(),
            user_code: flow.user_code.clone(),
            verification_uri: flow.verification_uri.clone(),
            status: status.to_string(),
        }
    }
}

/// GET /notifier/flows
async fn list_flows(State(state): State<AppState>) -> ApiResult<Vec<DeviceFlowDto>> {
    state.notifier.gc_stale_flows();
    let flows: Vec<DeviceFlowDto> = state.notifier.list_flows().iter().map(DeviceFlowDto::from).collect();
    Ok(Json(ApiResponse::success(flows, "device flows fetched")))
}

/// POST /notifier/flows/{profile}/start
async fn start_device_flow(State(state): State<AppState>, actor: ActorContext, Path(profile): Path<String>) -> ApiResult<DeviceFlowDto> {
    let flow = state.notifier.start_device_flow(&actor.tenant_id, &profile);
    Ok(Json(ApiResponse::success((&flow).into(), "device flow started")))
}

/// POST /notifier/flows/{profile}/logout
async fn logout(State(state): State<AppState>, actor: ActorContext, Path(profile): Path<String>) -> ApiResult<()> {
    state.notifier.logout(&actor.tenant_id, &profile).await.map_err(into_response)?;
    Ok(Json(ApiResponse::success((), "profile logged out")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_group_builds() {
        let _ = notifier_routes();
    }
}
