//! Tenant + actor extraction layer standing in for the excluded session/JWT
//! middleware — every handler gets a `TenantId`/`ActorContext` the way the
//! teacher's handlers get an `AuthUser`.

pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{ActorContext, TenantId};
