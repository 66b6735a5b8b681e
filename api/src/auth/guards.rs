use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};

use crate::auth::claims::ActorContext;
use crate::response::ApiResponse;

/// A dummy struct used for responses that do not carry a data payload.
#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Requires a valid tenant + actor context; injects it into the request's
/// extensions for downstream handlers.
pub async fn require_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();

    let actor = ActorContext::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Tenant and actor context required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

/// Requires an actor context whose role may review leaves and manage
/// cover/duty rosters (every role but plain `teacher`).
pub async fn require_reviewer(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();

    let actor = ActorContext::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Tenant and actor context required")),
            )
        })?;

    if !actor.can_review() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Reviewer access required")),
        ));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}
