use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::str::FromStr;

use crate::auth::claims::{ActorContext, TenantId};
use db::models::teacher::Role;

const TENANT_HEADER: &str = "x-tenant-id";
const ROLE_HEADER: &str = "x-actor-role";
const TEACHER_HEADER: &str = "x-actor-teacher-id";

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name)?.to_str().ok()
}

/// Extracts the tenant a request is scoped to from `X-Tenant-Id`.
///
/// # Errors
/// - `401 Unauthorized` if the header is missing or not valid UTF-8.
#[async_trait]
impl<S> FromRequestParts<S> for TenantId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant = header_str(parts, TENANT_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing X-Tenant-Id header"))?;
        Ok(TenantId(tenant.to_string()))
    }
}

/// Extracts the calling actor's tenant, role, and (if a teacher) id from
/// `X-Tenant-Id` + `X-Actor-Role` + `X-Actor-Teacher-Id`. Stands in for the
/// excluded JWT middleware (spec.md §7 `AuthRequired`).
///
/// # Errors
/// - `401 Unauthorized` if the tenant or role header is missing/invalid.
#[async_trait]
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TenantId(tenant_id) = TenantId::from_request_parts(parts, state).await?;

        let role = header_str(parts, ROLE_HEADER)
            .and_then(|v| Role::from_str(v).ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid X-Actor-Role header"))?;

        let teacher_id = header_str(parts, TEACHER_HEADER).and_then(|v| v.parse::<i64>().ok());

        Ok(ActorContext {
            tenant_id,
            role,
            teacher_id,
        })
    }
}
