use sea_orm::DatabaseConnection;
use services::cover_engine::CoverEngine;
use services::duty_scheduler::DutyScheduler;
use services::leave_manager::LeaveManager;
use services::notifier::NotifierService;
use services::webhooks::WebhookIngress;
use std::sync::Arc;

/// Shared application state threaded through every handler. Tenant and
/// actor identity are not part of this — they travel per-request via
/// `auth::claims::{TenantId, ActorContext}` extractors instead, since they
/// vary per call rather than being process-wide.
///
/// `notifier` is held as a single shared instance because its device-flow
/// poll state lives in-process (`NotifierService`'s `flows` map); every
/// other service only wraps repositories and a `reqwest::Client`, so a
/// fresh instance per call would be just as correct, but sharing one avoids
/// re-building a client per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: Arc<NotifierService>,
    pub leave_manager: Arc<LeaveManager>,
    pub cover_engine: Arc<CoverEngine>,
    pub duty_scheduler: Arc<DutyScheduler>,
    pub webhook_ingress: Arc<WebhookIngress>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            notifier: Arc::new(NotifierService::new(db.clone())),
            leave_manager: Arc::new(LeaveManager::new(db.clone())),
            cover_engine: Arc::new(CoverEngine::new(db.clone())),
            duty_scheduler: Arc::new(DutyScheduler::new(db.clone())),
            webhook_ingress: Arc::new(WebhookIngress::new(db.clone())),
            db,
        }
    }
}
