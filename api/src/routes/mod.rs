//! # Application Routes
//!
//! Top-level routing configuration for the API. Each submodule owns one
//! route group; this file nests them under their base paths and applies
//! the tenant/actor auth middleware (`auth::guards`) around everything but
//! `/health` and `/external` (the former needs no identity, the latter is
//! authenticated by shared secret instead of an actor header).

use axum::middleware::from_fn;
use axum::Router;

use crate::auth::guards::require_authenticated;
use crate::auth::middleware::log_request;
use crate::state::AppState;

pub mod cover;
pub mod duty;
pub mod health;
pub mod leave;
pub mod notifier;
pub mod webhooks;

pub fn routes(state: AppState) -> Router {
    let authenticated = Router::new()
        .nest("/leave", leave::leave_routes())
        .nest("/cover", cover::cover_routes())
        .nest("/duty", duty::duty_routes())
        .nest("/notifier", notifier::notifier_routes())
        .route_layer(from_fn(require_authenticated));

    Router::new()
        .nest("/health", health::health_routes())
        .nest("/external", webhooks::webhook_routes())
        .merge(authenticated)
        .layer(from_fn(log_request))
        .with_state(state)
}
