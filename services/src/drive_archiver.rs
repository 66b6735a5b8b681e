//! Drive archiver (C5): uploads a sick-leave attachment into a Graph-like
//! remote drive, in the rolling half-month folder computed by
//! `util::calendar::drive_window`.

use crate::error::{ServiceError, ServiceResult};
use crate::notifier::NotifierService;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

const SINGLE_PUT_LIMIT: usize = 4 * 1024 * 1024;
const CHUNK_SIZE: usize = 5 * 1024 * 1024;

pub struct ArchiveRequest<'a> {
    pub tenant_id: &'a str,
    pub teacher_name: &'a str,
    pub leave_date: NaiveDate,
    pub request_id: i64,
    pub local_path: &'a Path,
    pub previous_export_path: Option<&'a str>,
    pub share_with: &'a [String],
}

pub struct ArchiveOutcome {
    pub export_path: String,
    pub exported_at: DateTime<Utc>,
}

pub struct DriveArchiverService<'a> {
    notifier: &'a NotifierService,
    http: reqwest::Client,
}

impl<'a> DriveArchiverService<'a> {
    pub fn new(notifier: &'a NotifierService) -> Self {
        Self {
            notifier,
            http: reqwest::Client::new(),
        }
    }

    pub async fn archive(&self, req: ArchiveRequest<'_>) -> ServiceResult<ArchiveOutcome> {
        let token = self.notifier.get_token_silent(req.tenant_id, "absence").await?;

        let (start, end) = util::calendar::drive_window(req.leave_date);
        let folder = util::calendar::drive_window_folder_name(req.leave_date);
        let _ = (start, end);
        self.ensure_folder(&token, &folder).await?;

        let ext = req
            .local_path
            .extension()
            .and_then(|e| e.to_str());
        let filename = util::paths::drive_file_name(req.teacher_name, req.leave_date, req.request_id, ext);
        let export_path = format!("{folder}/{filename}");

        if let Some(previous) = req.previous_export_path {
            if previous != export_path {
                self.delete_best_effort(&token, previous).await;
            }
        }

        let bytes = tokio::fs::read(req.local_path)
            .await
            .map_err(|e| ServiceError::TransientIo(format!("failed to read attachment for archiving: {e}")))?;

        if bytes.len() <= SINGLE_PUT_LIMIT {
            self.upload_single(&token, &export_path, &bytes).await?;
        } else {
            self.upload_chunked(&token, &export_path, &bytes).await?;
        }

        if !req.share_with.is_empty() {
            self.share(&token, &export_path, req.share_with).await?;
        }

        Ok(ArchiveOutcome {
            export_path,
            exported_at: Utc::now(),
        })
    }

    async fn ensure_folder(&self, token: &str, folder: &str) -> ServiceResult<()> {
        let url = self.graph_url(&format!("root:/{folder}"));
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("folder create request failed: {e}")))?;
        if resp.status().is_success() || resp.status() == reqwest::StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(ServiceError::TransientIo(format!(
                "folder create failed with status {}",
                resp.status()
            )))
        }
    }

    async fn upload_single(&self, token: &str, export_path: &str, bytes: &[u8]) -> ServiceResult<()> {
        let url = self.graph_url(&format!("root:/{export_path}:/content"));
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .timeout(self.timeout())
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("single-put upload failed: {e}")))?;
        match resp.status().as_u16() {
            200 | 201 => Ok(()),
            status => Err(ServiceError::TransientIo(format!("upload rejected with status {status}"))),
        }
    }

    async fn upload_chunked(&self, token: &str, export_path: &str, bytes: &[u8]) -> ServiceResult<()> {
        let session_url = self
            .graph_url(&format!("root:/{export_path}:/createUploadSession"));
        let session: UploadSession = self
            .http
            .post(&session_url)
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("upload session create failed: {e}")))?
            .json()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("upload session response malformed: {e}")))?;

        let total = bytes.len();
        let mut offset = 0usize;
        while offset < total {
            let end = (offset + CHUNK_SIZE).min(total);
            let chunk = &bytes[offset..end];
            let content_range = format!("bytes {offset}-{}/{total}", end - 1);

            let resp = self
                .http
                .put(&session.upload_url)
                .header("Content-Range", content_range)
                .timeout(self.timeout())
                .body(chunk.to_vec())
                .send()
                .await
                .map_err(|e| ServiceError::TransientIo(format!("chunk upload failed: {e}")))?;

            match resp.status().as_u16() {
                200 | 201 => return Ok(()),
                202 => {}
                status => {
                    return Err(ServiceError::TransientIo(format!(
                        "chunk upload rejected with status {status}"
                    )))
                }
            }
            offset = end;
        }
        Ok(())
    }

    async fn delete_best_effort(&self, token: &str, export_path: &str) {
        let url = self.graph_url(&format!("root:/{export_path}"));
        if let Err(e) = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
        {
            tracing::warn!(error = %e, path = export_path, "failed to delete previous drive export, continuing");
        }
    }

    async fn share(&self, token: &str, export_path: &str, recipients: &[String]) -> ServiceResult<()> {
        let url = self.graph_url(&format!("root:/{export_path}:/invite"));
        let body = serde_json::json!({
            "requireSignIn": true,
            "sendInvitation": false,
            "roles": ["read"],
            "recipients": recipients.iter().map(|e| serde_json::json!({"email": e})).collect::<Vec<_>>(),
        });
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .timeout(self.timeout())
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::TransientIo(format!("share invite failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::TransientIo(format!(
                "share invite rejected with status {}",
                resp.status()
            )))
        }
    }

    fn graph_url(&self, path: &str) -> String {
        format!("https://graph.microsoft.com/v1.0/me/drive/{path}")
    }

    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(common::config::Config::get().drive_io_timeout_secs)
    }
}

#[derive(serde::Deserialize)]
struct UploadSession {
    #[serde(rename = "uploadUrl")]
    upload_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_vs_chunked_threshold_matches_4mib() {
        assert_eq!(SINGLE_PUT_LIMIT, 4 * 1024 * 1024);
        assert_eq!(CHUNK_SIZE, 5 * 1024 * 1024);
    }
}
