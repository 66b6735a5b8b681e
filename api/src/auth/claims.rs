use db::models::teacher::Role;
use serde::Serialize;

/// The tenant a request is scoped to, extracted from `X-Tenant-Id`. Every
/// handler that touches the database takes one of these rather than
/// trusting a path/query parameter, since tenant isolation is enforced at
/// the repository-filter level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantId(pub String);

/// Stands in for the excluded session/JWT auth: who is making this request,
/// within which tenant, extracted from `X-Tenant-Id` + `X-Actor-Role` +
/// `X-Actor-Teacher-Id` (mirrors the teacher's `AuthUser`/`Claims` shape).
#[derive(Debug, Clone, Serialize)]
pub struct ActorContext {
    pub tenant_id: String,
    pub role: Role,
    pub teacher_id: Option<i64>,
}

impl ActorContext {
    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }
}
