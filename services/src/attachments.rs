//! Attachment store (C4): validated upload, atomic write, idempotent delete
//! for sick-leave medical attachments.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use db::models::leave_request::AttachmentStatus;
use db::repositories::leave_request_repository::{LeaveRequestFilter, LeaveRequestRepository};
use db::repositories::repository::Repository;
use std::path::PathBuf;
use uuid::Uuid;

const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "heic", "doc", "docx"];

pub struct UploadedAttachment {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

pub struct StoredAttachment {
    pub relative_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub extension: Option<String>,
}

fn extract_extension(filename: &str) -> Option<String> {
    PathBuf::from(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn validate(upload: &UploadedAttachment) -> ServiceResult<String> {
    if upload.original_name.trim().is_empty() {
        return Err(ServiceError::Validation("attachment filename is empty".into()));
    }
    let ext = extract_extension(&upload.original_name)
        .ok_or_else(|| ServiceError::Validation("attachment has no file extension".into()))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ServiceError::Validation(format!(
            "attachment extension .{ext} is not accepted"
        )));
    }
    if upload.bytes.is_empty() {
        return Err(ServiceError::Validation("attachment is empty".into()));
    }
    if upload.bytes.len() > MAX_ATTACHMENT_BYTES {
        return Err(ServiceError::Validation("attachment exceeds the 10MB limit".into()));
    }
    Ok(ext)
}

/// Validate and persist an uploaded attachment, writing to a temp file in the
/// same directory before an atomic rename so a crash mid-write never leaves a
/// partial file at the final path.
pub async fn store(upload: UploadedAttachment) -> ServiceResult<StoredAttachment> {
    let ext = validate(&upload)?;
    let uploaded_at = Utc::now();
    let id = Uuid::new_v4();
    let relative_path = util::paths::sickleave_attachment_relative_path(uploaded_at, id, Some(&ext));
    let final_path = util::paths::resolve_attachment_path(&relative_path)
        .ok_or_else(|| ServiceError::Fatal("generated attachment path failed traversal check".into()))?;

    util::paths::ensure_parent_dir(&final_path)
        .map_err(|e| ServiceError::Fatal(format!("failed to create attachment directory: {e}")))?;

    let tmp_path = final_path.with_extension(format!("{ext}.tmp-{id}"));
    tokio::fs::write(&tmp_path, &upload.bytes)
        .await
        .map_err(|e| ServiceError::TransientIo(format!("failed to write attachment: {e}")))?;
    tokio::fs::rename(&tmp_path, &final_path).await.map_err(|e| {
        ServiceError::TransientIo(format!("failed to finalize attachment write: {e}"))
    })?;

    Ok(StoredAttachment {
        relative_path,
        uploaded_at,
        extension: Some(ext),
    })
}

/// Remove a stored attachment from disk. Missing files are not an error —
/// the caller may be retrying a delete whose filesystem half already landed.
pub async fn delete(relative_path: &str) -> ServiceResult<()> {
    let Some(path) = util::paths::resolve_attachment_path(relative_path) else {
        return Err(ServiceError::Validation("attachment path failed traversal check".into()));
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ServiceError::TransientIo(format!("failed to delete attachment: {e}"))),
    }
}

pub struct AttachmentService {
    leave_requests: LeaveRequestRepository,
}

impl AttachmentService {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self {
            leave_requests: LeaveRequestRepository::new(db),
        }
    }

    /// A teacher with no attachment yet on a pending/missing sickleave row at
    /// `leave_date` may still submit one ("no document" has not yet fired).
    pub async fn is_awaiting_attachment(
        &self,
        tenant_id: &str,
        teacher_id: i64,
        leave_date: chrono::NaiveDate,
    ) -> ServiceResult<bool> {
        let filter = LeaveRequestFilter {
            tenant_id: Some(tenant_id.to_string()),
            teacher_id: Some(teacher_id),
            leave_date: Some(leave_date),
            status: None,
            leave_type: None,
        };
        let rows = self.leave_requests.find_all(filter).await?;
        Ok(rows
            .iter()
            .any(|r| r.attachment_required && r.attachment_status == AttachmentStatus::Missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_filename() {
        let upload = UploadedAttachment {
            original_name: "".into(),
            bytes: vec![1, 2, 3],
        };
        let err = store(upload).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_disallowed_extension() {
        let upload = UploadedAttachment {
            original_name: "note.exe".into(),
            bytes: vec![1, 2, 3],
        };
        let err = store(upload).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_oversized_attachment() {
        let upload = UploadedAttachment {
            original_name: "scan.pdf".into(),
            bytes: vec![0u8; MAX_ATTACHMENT_BYTES + 1],
        };
        let err = store(upload).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn stores_valid_attachment_under_storage_root() {
        let _dir = util::test_helpers::init_test_config();
        let upload = UploadedAttachment {
            original_name: "scan.pdf".into(),
            bytes: vec![1, 2, 3, 4],
        };
        let stored = store(upload).await.unwrap();
        assert!(stored.relative_path.starts_with("uploads/sickleave/"));
        assert!(stored.relative_path.ends_with(".pdf"));

        let resolved = util::paths::resolve_attachment_path(&stored.relative_path).unwrap();
        assert!(resolved.exists());

        delete(&stored.relative_path).await.unwrap();
        assert!(!resolved.exists());

        delete(&stored.relative_path).await.unwrap();
    }
}
