use common::config::Config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global attachment storage root (absolute), from `Config::attachment_root`.
/// If relative, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = Config::get().attachment_root.clone();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Directory that holds submitted sick-leave attachments, relative to the storage root.
pub fn sickleave_uploads_dir() -> PathBuf {
    storage_root().join("uploads").join("sickleave")
}

/// Rejects any relative path component that escapes the storage root
/// (`..`, absolute paths, or empty segments once normalized).
pub fn is_safe_relative_path(relative: &str) -> bool {
    let path = Path::new(relative);
    if path.is_absolute() {
        return false;
    }
    !path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir | std::path::Component::RootDir))
}

/// Resolve a stored relative attachment path against the storage root, refusing traversal.
pub fn resolve_attachment_path(relative: &str) -> Option<PathBuf> {
    if !is_safe_relative_path(relative) {
        return None;
    }
    Some(storage_root().join(relative))
}

/// Build the storage-relative path for a newly uploaded sick-leave attachment:
/// `uploads/sickleave/<YYYYMMDDhhmmss>_<uuid><ext>`.
pub fn sickleave_attachment_relative_path(
    uploaded_at: chrono::DateTime<chrono::Utc>,
    id: uuid::Uuid,
    ext: Option<&str>,
) -> String {
    let stamp = uploaded_at.format("%Y%m%d%H%M%S");
    let suffix = match ext {
        Some(e) if !e.is_empty() => format!(".{}", e.trim_start_matches('.')),
        _ => String::new(),
    };
    format!("uploads/sickleave/{stamp}_{id}{suffix}")
}

/// Sanitize a teacher's display name for use in a drive file name: keep
/// alphanumerics, spaces become `_`, everything else is dropped.
pub fn sanitize_name_for_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Drive file name for an archived attachment: `<TeacherName>-<leave_date>-REQ<id><ext>`.
pub fn drive_file_name(
    teacher_name: &str,
    leave_date: chrono::NaiveDate,
    request_id: i64,
    ext: Option<&str>,
) -> String {
    let name = sanitize_name_for_filename(teacher_name);
    let suffix = match ext {
        Some(e) if !e.is_empty() => format!(".{}", e.trim_start_matches('.')),
        _ => String::new(),
    };
    format!("{name}-{leave_date}-REQ{request_id}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serial_test::serial;

    #[test]
    #[serial]
    fn relative_path_traversal_is_rejected() {
        assert!(!is_safe_relative_path("../../etc/passwd"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(is_safe_relative_path("uploads/sickleave/foo.pdf"));
    }

    #[test]
    #[serial]
    fn sickleave_relative_path_has_expected_shape() {
        let when = chrono::Utc.with_ymd_and_hms(2025, 3, 11, 9, 30, 0).unwrap();
        let id = uuid::Uuid::nil();
        let rel = sickleave_attachment_relative_path(when, id, Some(".pdf"));
        assert_eq!(
            rel,
            format!("uploads/sickleave/20250311093000_{id}.pdf")
        );
    }

    #[test]
    #[serial]
    fn drive_file_name_sanitizes_and_formats() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let name = drive_file_name("T1 O'Brien", date, 42, Some("pdf"));
        assert_eq!(name, "T1_OBrien-2025-03-11-REQ42.pdf");
    }

    #[test]
    #[serial]
    fn resolve_rejects_traversal_and_accepts_valid() {
        let _dir = crate::test_helpers::init_test_config();
        assert!(resolve_attachment_path("../escape").is_none());
        assert!(resolve_attachment_path("uploads/sickleave/a.pdf").is_some());
    }
}
