use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::info;

use crate::auth::claims::ActorContext;

/// Logs method, path, IP address, tenant, and actor role/teacher id (when
/// present) for each incoming HTTP request. Skips CORS preflight `OPTIONS`
/// requests.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        let req = Request::from_parts(parts, body);
        return Ok(next.run(req).await);
    }

    let actor = ActorContext::from_request_parts(&mut parts, &()).await.ok();

    info!(
        method = ?parts.method,
        path = %parts.uri.path(),
        ip = %addr.ip(),
        tenant = actor.as_ref().map(|a| a.tenant_id.as_str()).unwrap_or("unknown"),
        role = actor.as_ref().map(|a| a.role.to_string()).unwrap_or_else(|| "none".into()),
        teacher_id = actor.as_ref().and_then(|a| a.teacher_id).unwrap_or(0),
        "Incoming request"
    );

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}
