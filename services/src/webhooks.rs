//! Webhook egress/ingress (C10): outbound leave-approval + cover-forward
//! POSTs, and the inbound `/external/leave-approvals` upsert that
//! synchronously drives the cover engine (spec §4.9, §6).

use crate::cover_engine::CoverEngine;
use crate::error::{ServiceError, ServiceResult};
use chrono::{NaiveDate, Utc};
use db::models::incoming_leave_record::{ForwardStatus, Model as IncomingLeaveRecord};
use db::models::leave_request::Model as LeaveRequest;
use db::models::teacher::Model as Teacher;
use db::repositories::incoming_leave_record_repository::{IncomingLeaveRecordFilter, IncomingLeaveRecordRepository};
use db::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set};
use serde::Serialize;
use std::time::Duration;

/// Leave-approval payload emitted by the leave service (spec §6). Mirrors
/// the wire schema field-for-field so serialization round-trips exactly.
#[derive(Serialize)]
pub struct LeaveApprovalPayload {
    pub request_id: String,
    pub excuse_id: i64,
    pub email: String,
    pub teacher_name: String,
    pub teacher: TeacherRef,
    pub leave_type: String,
    pub leave_start: String,
    pub leave_end: String,
    pub submitted_at: String,
    pub status: String,
    pub reason: String,
    pub admin_comment: Option<String>,
    pub generated_at: String,
}

#[derive(Serialize)]
pub struct TeacherRef {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl LeaveApprovalPayload {
    pub fn from_leave(leave: &LeaveRequest, teacher: &Teacher) -> Self {
        Self {
            request_id: format!("req-{}", leave.id),
            excuse_id: leave.id,
            email: teacher.email.clone(),
            teacher_name: teacher.name.clone(),
            teacher: TeacherRef {
                id: teacher.id,
                name: teacher.name.clone(),
                email: teacher.email.clone(),
            },
            leave_type: leave.leave_type.to_string(),
            leave_start: leave.leave_date.to_string(),
            leave_end: leave.end_date.to_string(),
            submitted_at: leave.created_at.to_rfc3339(),
            status: leave.status.to_string(),
            reason: leave.reason.clone(),
            admin_comment: leave.admin_comment.clone(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

pub struct WebhookEgress {
    http: reqwest::Client,
}

impl Default for WebhookEgress {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookEgress {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// POST the leave-approval payload to `LEAVE_APPROVAL_WEBHOOK_URL`.
    /// Fires on every status, including `pending` (spec §4.6). A no-op when
    /// the URL is not configured.
    pub async fn send_leave_approval(&self, leave: &LeaveRequest, teacher: &Teacher) -> ServiceResult<()> {
        let cfg = common::config::Config::get();
        let Some(url) = cfg.leave_approval_webhook_url.clone() else {
            return Ok(());
        };
        let payload = LeaveApprovalPayload::from_leave(leave, teacher);

        let mut req = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(cfg.leave_approval_webhook_timeout_secs))
            .json(&payload);
        if let Some(secret) = &cfg.leave_approval_webhook_secret {
            req = req.header("X-Leave-Webhook-Secret", secret);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("leave-approval webhook failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::TransientIo(format!(
                "leave-approval webhook rejected with status {}",
                resp.status()
            )))
        }
    }

    /// POST a derived cover-service payload to `COVERS_FORWARD_URL`,
    /// returning the outcome to persist on the incoming record rather than
    /// propagating — forwarding failures are retried on the next approved
    /// upsert, never block the ingress response (spec §7 TransientIo).
    pub async fn forward_to_covers(&self, record: &IncomingLeaveRecord) -> (ForwardStatus, String) {
        let cfg = common::config::Config::get();
        let Some(url) = cfg.covers_forward_url.clone() else {
            return (ForwardStatus::Failed, "COVERS_FORWARD_URL not configured".into());
        };
        let body = serde_json::json!({
            "request_id": record.request_id,
            "teacher_email": record.teacher_email,
            "leave_start": record.leave_start,
            "leave_end": record.leave_end,
            "status": record.status,
        });
        let mut req = self.http.post(&url).timeout(Duration::from_secs(10)).json(&body);
        if let Some(secret) = &cfg.covers_forward_secret {
            req = req.header("X-Covers-Forward-Secret", secret);
        }
        match req.send().await {
            Ok(resp) if resp.status().is_success() => (ForwardStatus::Sent, format!("status {}", resp.status())),
            Ok(resp) => (ForwardStatus::Failed, format!("status {}", resp.status())),
            Err(e) => (ForwardStatus::Failed, e.to_string()),
        }
    }
}

/// Checks `provided` (the `X-Leave-Webhook-Secret` header value, if any)
/// against `LEAVE_WEBHOOK_SECRET`. A no-op when no secret is configured.
pub fn verify_inbound_secret(provided: Option<&str>) -> ServiceResult<()> {
    let Some(expected) = common::config::Config::get().leave_webhook_secret.as_deref() else {
        return Ok(());
    };
    if provided == Some(expected) {
        Ok(())
    } else {
        Err(ServiceError::AuthRequired("bad or missing X-Leave-Webhook-Secret".into()))
    }
}

fn parse_date(raw: &str) -> NaiveDate {
    for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d;
        }
    }
    util::calendar::now_civil().date_naive()
}

pub struct WebhookIngress {
    incoming: IncomingLeaveRecordRepository,
    egress: WebhookEgress,
    cover_engine: CoverEngine,
}

impl WebhookIngress {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            incoming: IncomingLeaveRecordRepository::new(db.clone()),
            egress: WebhookEgress::new(),
            cover_engine: CoverEngine::new(db),
        }
    }

    /// Validate, upsert, and (on success) synchronously trigger cover
    /// assignment for `body` (spec §4.9). Downstream forwarding and cover
    /// assignment failures are logged, never propagated: the upsert already
    /// committed by the time either runs.
    pub async fn ingest(&self, tenant_id: &str, body: serde_json::Value) -> ServiceResult<IncomingLeaveRecord> {
        let request_id = body
            .get("request_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ServiceError::Validation("request_id is required".into()))?
            .to_string();
        let teacher_email = body
            .get("email")
            .and_then(|v| v.as_str())
            .or_else(|| body.get("teacher").and_then(|t| t.get("email")).and_then(|v| v.as_str()))
            .ok_or_else(|| ServiceError::Validation("teacher email is required".into()))?
            .to_string();
        let teacher_name = body
            .get("teacher_name")
            .and_then(|v| v.as_str())
            .or_else(|| body.get("teacher").and_then(|t| t.get("name")).and_then(|v| v.as_str()))
            .map(|s| s.to_string());

        let start_raw = body
            .get("leave_start")
            .and_then(|v| v.as_str())
            .or_else(|| body.get("leave_date").and_then(|v| v.as_str()))
            .ok_or_else(|| ServiceError::Validation("leave_start or leave_date is required".into()))?;
        let leave_start = parse_date(start_raw);
        let leave_end = body
            .get("leave_end")
            .and_then(|v| v.as_str())
            .map(parse_date)
            .unwrap_or(leave_start);

        let status = body.get("status").and_then(|v| v.as_str()).unwrap_or("pending").to_string();

        let filter = IncomingLeaveRecordFilter {
            tenant_id: Some(tenant_id.to_string()),
            request_id: Some(request_id.clone()),
        };
        let existing = self.incoming.find_one(filter).await?;
        let now = Utc::now();

        let record = if let Some(row) = existing {
            let mut am = row.into_active_model();
            am.teacher_email = Set(teacher_email);
            am.teacher_name = Set(teacher_name);
            am.leave_start = Set(leave_start);
            am.leave_end = Set(leave_end);
            am.status = Set(status);
            am.raw_payload = Set(body.clone());
            am.updated_at = Set(now);
            self.incoming.update(am).await?
        } else {
            use db::models::incoming_leave_record::ActiveModel;
            let am = ActiveModel {
                tenant_id: Set(tenant_id.to_string()),
                request_id: Set(request_id),
                teacher_email: Set(teacher_email),
                teacher_name: Set(teacher_name),
                leave_start: Set(leave_start),
                leave_end: Set(leave_end),
                status: Set(status),
                raw_payload: Set(body.clone()),
                forward_status: Set(None),
                forward_detail: Set(None),
                forwarded_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            self.incoming.create(am).await?
        };

        if record.status == "approved"
            && record.forward_status != Some(ForwardStatus::Sent)
            && common::config::Config::get().covers_forward_url.is_some()
        {
            let (forward_status, detail) = self.egress.forward_to_covers(&record).await;
            let mut am = record.clone().into_active_model();
            am.forward_status = Set(Some(forward_status));
            am.forward_detail = Set(Some(detail));
            am.forwarded_at = Set(Some(Utc::now()));
            if let Err(e) = self.incoming.update(am).await {
                tracing::warn!(error = %e, request_id = %record.request_id, "failed to persist forward outcome");
            }
        }

        if let Err(e) = self.cover_engine.assign_for_record(tenant_id, &record).await {
            tracing::warn!(error = %e, request_id = %record.request_id, "cover assignment failed during webhook ingest");
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_and_dd_mm_yyyy() {
        assert_eq!(parse_date("2025-03-11"), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert_eq!(parse_date("11-03-2025"), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }
}
