//! Notifier (C6): per-profile OAuth token cache plus best-effort email send.
//!
//! The durable half of the cache (refresh/access token, account id) lives in
//! `notifier_tokens`; the volatile half (in-flight device-code polls) lives
//! in an in-process map, since a flow that outlives a process restart is
//! meant to simply be started again.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use db::repositories::notifier_token_repository::{NotifierTokenFilter, NotifierTokenRepository};
use db::repositories::repository::Repository;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Mutex;

const DEVICE_FLOW_TTL: ChronoDuration = ChronoDuration::minutes(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFlowStatus {
    Pending,
    Completed,
    Expired,
}

#[derive(Debug, Clone)]
pub struct DeviceFlow {
    pub profile: String,
    pub user_code: String,
    pub verification_uri: String,
    pub device_code: String,
    pub started_at: DateTime<Utc>,
    pub status: DeviceFlowStatus,
}

pub struct NotifierService {
    tokens: NotifierTokenRepository,
    flows: Mutex<HashMap<String, DeviceFlow>>,
    http: reqwest::Client,
}

impl NotifierService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tokens: NotifierTokenRepository::new(db),
            flows: Mutex::new(HashMap::new()),
            http: reqwest::Client::new(),
        }
    }

    fn key(tenant_id: &str, profile: &str) -> String {
        format!("{tenant_id}:{profile}")
    }

    /// Remove any device flow started more than 30 minutes ago and not
    /// completed in the meantime, marking it `Expired` if still `Pending`.
    pub fn gc_stale_flows(&self) {
        let mut flows = self.flows.lock().unwrap();
        let now = Utc::now();
        flows.retain(|_, f| match f.status {
            DeviceFlowStatus::Pending => now - f.started_at < DEVICE_FLOW_TTL,
            DeviceFlowStatus::Completed | DeviceFlowStatus::Expired => {
                now - f.started_at < DEVICE_FLOW_TTL
            }
        });
    }

    /// A cached, still-valid access token for this profile, or `AuthRequired`
    /// if none is cached or the refresh token itself has been rejected. The
    /// caller is expected to treat `AuthRequired` as "skip this archive/send
    /// and let the operator re-auth", never as a hard failure.
    pub async fn get_token_silent(&self, tenant_id: &str, profile: &str) -> ServiceResult<String> {
        let filter = NotifierTokenFilter {
            tenant_id: Some(tenant_id.to_string()),
            profile: Some(profile.to_string()),
        };
        let row = self
            .tokens
            .find_one(filter)
            .await?
            .ok_or_else(|| ServiceError::AuthRequired(format!("no cached token for profile {profile}")))?;

        let access_token = row
            .access_token
            .ok_or_else(|| ServiceError::AuthRequired(format!("profile {profile} has never completed auth")))?;

        if let Some(expires_at) = row.access_token_expires_at {
            if expires_at > Utc::now() {
                return Ok(access_token);
            }
        }

        let refresh_token = row
            .refresh_token
            .ok_or_else(|| ServiceError::AuthRequired(format!("profile {profile} has no refresh token")))?;
        self.refresh(tenant_id, profile, &refresh_token).await
    }

    async fn refresh(&self, tenant_id: &str, profile: &str, refresh_token: &str) -> ServiceResult<String> {
        let client_id = common::config::Config::get()
            .drive_client_id
            .clone()
            .ok_or_else(|| ServiceError::AuthRequired("drive client id not configured".into()))?;
        let drive_tenant = common::config::Config::get()
            .drive_tenant_id
            .clone()
            .unwrap_or_else(|| "common".into());
        let url = format!("https://login.microsoftonline.com/{drive_tenant}/oauth2/v2.0/token");

        let resp = self
            .http
            .post(&url)
            .form(&[
                ("client_id", client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("token refresh request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ServiceError::AuthRequired(format!(
                "token refresh rejected with status {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("token refresh response malformed: {e}")))?;

        self.persist_token(tenant_id, profile, &body).await?;
        Ok(body.access_token)
    }

    async fn persist_token(&self, tenant_id: &str, profile: &str, token: &TokenResponse) -> ServiceResult<()> {
        use db::models::notifier_token::ActiveModel;
        use sea_orm::{IntoActiveModel, Set};

        let filter = NotifierTokenFilter {
            tenant_id: Some(tenant_id.to_string()),
            profile: Some(profile.to_string()),
        };
        let existing = self.tokens.find_one(filter).await?;
        let expires_at = Utc::now() + ChronoDuration::seconds(token.expires_in as i64);

        if let Some(row) = existing {
            let mut am: ActiveModel = row.into();
            am.access_token = Set(Some(token.access_token.clone()));
            am.access_token_expires_at = Set(Some(expires_at));
            if let Some(rt) = &token.refresh_token {
                am.refresh_token = Set(Some(rt.clone()));
            }
            am.updated_at = Set(Utc::now());
            self.tokens.update(am).await?;
        } else {
            let am = ActiveModel {
                tenant_id: Set(tenant_id.to_string()),
                profile: Set(profile.to_string()),
                account_id: Set(None),
                refresh_token: Set(token.refresh_token.clone()),
                access_token: Set(Some(token.access_token.clone())),
                access_token_expires_at: Set(Some(expires_at)),
                updated_at: Set(Utc::now()),
            };
            self.tokens.create(am).await?;
        }
        Ok(())
    }

    /// Begin a device-code flow for `profile`. In production this would call
    /// the identity platform's `/devicecode` endpoint; what's persisted here
    /// is the subset the UI needs to show the operator a code to enter.
    pub fn start_device_flow(&self, tenant_id: &str, profile: &str) -> DeviceFlow {
        let flow = DeviceFlow {
            profile: profile.to_string(),
            user_code: uuid::Uuid::new_v4().to_string()[..8].to_uppercase(),
            verification_uri: "https://microsoft.com/devicelogin".into(),
            device_code: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            status: DeviceFlowStatus::Pending,
        };
        self.flows
            .lock()
            .unwrap()
            .insert(Self::key(tenant_id, profile), flow.clone());
        flow
    }

    pub fn list_flows(&self) -> Vec<DeviceFlow> {
        self.flows.lock().unwrap().values().cloned().collect()
    }

    /// Forget a profile's cached credentials without contacting Microsoft —
    /// the next `get_token_silent` call will return `AuthRequired`.
    pub async fn logout(&self, tenant_id: &str, profile: &str) -> ServiceResult<()> {
        self.flows.lock().unwrap().remove(&Self::key(tenant_id, profile));
        let filter = NotifierTokenFilter {
            tenant_id: Some(tenant_id.to_string()),
            profile: Some(profile.to_string()),
        };
        if let Some(row) = self.tokens.find_one(filter).await? {
            self.tokens.delete((row.tenant_id, row.profile)).await?;
        }
        Ok(())
    }

    /// Best-effort email send. Failures are surfaced as `TransientIo` and
    /// never block the caller's primary operation (spec §7).
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> ServiceResult<()> {
        let cfg = common::config::Config::get();
        let host = cfg
            .smtp_host
            .clone()
            .ok_or_else(|| ServiceError::TransientIo("smtp not configured".into()))?;
        let from = cfg
            .smtp_from
            .clone()
            .ok_or_else(|| ServiceError::TransientIo("smtp sender not configured".into()))?;

        let message = Message::builder()
            .from(from.parse::<Mailbox>().map_err(|e| ServiceError::Validation(e.to_string()))?)
            .to(to.parse::<Mailbox>().map_err(|e| ServiceError::Validation(e.to_string()))?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .map_err(|e| ServiceError::TransientIo(format!("smtp relay setup failed: {e}")))?
            .port(cfg.smtp_port);
        if let (Some(user), Some(pass)) = (&cfg.smtp_username, &cfg.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let transport = builder.build();

        transport
            .send(message)
            .await
            .map_err(|e| ServiceError::TransientIo(format!("send failed: {e}")))?;
        Ok(())
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_flow_gc_drops_entries_older_than_ttl() {
        let svc = NotifierService::new_for_test();
        let mut flow = svc.start_device_flow("tenant-a", "calendar-bot");
        flow.started_at = Utc::now() - ChronoDuration::minutes(31);
        svc.flows
            .lock()
            .unwrap()
            .insert(NotifierService::key("tenant-a", "calendar-bot"), flow);
        svc.gc_stale_flows();
        assert!(svc.list_flows().is_empty());
    }

    impl NotifierService {
        fn new_for_test() -> Self {
            let _dir = util::test_helpers::init_test_config();
            let rt = tokio::runtime::Runtime::new().unwrap();
            let db = rt.block_on(db::create_test_db());
            NotifierService::new(db)
        }
    }
}
