use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs};

/// Process-wide configuration, loaded once from `.env` plus the real
/// environment. Every field here is read with the teacher's
/// `env::var(...).expect(...)` / `.unwrap_or_else(...)` style rather than a
/// config-file format, matching how the rest of the workspace treats
/// configuration as ambient environment, not application state.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,

    /// UAE is fixed at UTC+4 with no DST; kept configurable only so tests can
    /// shift it.
    pub civil_timezone_offset_hours: i32,

    /// Outbound webhook the leave service POSTs approved (and pending)
    /// leaves to.
    pub leave_approval_webhook_url: Option<String>,
    pub leave_approval_webhook_secret: Option<String>,
    pub leave_approval_webhook_timeout_secs: u64,

    /// Downstream the schedule service forwards a derived cover payload to.
    pub covers_forward_url: Option<String>,
    pub covers_forward_secret: Option<String>,

    /// Shared secret the schedule service's own `/external/leave-approvals`
    /// endpoint checks on `X-Leave-Webhook-Secret`.
    pub leave_webhook_secret: Option<String>,

    /// External availability API consulted by the duty scheduler.
    pub availability_api_url: Option<String>,
    pub availability_api_timeout_secs: u64,

    /// Drive (OneDrive/Graph) client + tenant identifiers for the archiver's
    /// OAuth device flow.
    pub drive_client_id: Option<String>,
    pub drive_tenant_id: Option<String>,
    pub drive_io_timeout_secs: u64,

    /// SMTP-equivalent notifier credentials, per `services::notifier`.
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,

    /// Attachment-store limits (spec §4.3).
    pub attachment_max_bytes: u64,
    pub attachment_root: String,

    /// Reminder worker scan interval, in seconds; spec caps it at 24h.
    pub reminder_scan_interval_secs: u64,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name =
                env::var("PROJECT_NAME").unwrap_or_else(|_| "absence-cover-duty".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/api.log".into());
            let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
            let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
            let port = env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000);

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            let civil_timezone_offset_hours = env::var("CIVIL_TIMEZONE_OFFSET_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4);

            let leave_approval_webhook_url = env::var("LEAVE_APPROVAL_WEBHOOK_URL").ok();
            let leave_approval_webhook_secret = env::var("LEAVE_APPROVAL_WEBHOOK_SECRET").ok();
            let leave_approval_webhook_timeout_secs = env::var("LEAVE_APPROVAL_WEBHOOK_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30);

            let covers_forward_url = env::var("COVERS_FORWARD_URL").ok();
            let covers_forward_secret = env::var("COVERS_FORWARD_SECRET").ok();
            let leave_webhook_secret = env::var("LEAVE_WEBHOOK_SECRET").ok();

            let availability_api_url = env::var("AVAILABILITY_API_URL").ok();
            let availability_api_timeout_secs = env::var("AVAILABILITY_API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);

            let drive_client_id = env::var("DRIVE_CLIENT_ID").ok();
            let drive_tenant_id = env::var("DRIVE_TENANT_ID").ok();
            let drive_io_timeout_secs = env::var("DRIVE_IO_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30);

            let smtp_host = env::var("SMTP_HOST").ok();
            let smtp_port = env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587);
            let smtp_username = env::var("SMTP_USERNAME").ok();
            let smtp_password = env::var("SMTP_PASSWORD").ok();
            let smtp_from = env::var("SMTP_FROM").ok();

            let attachment_max_bytes = env::var("ATTACHMENT_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024);
            let attachment_root =
                env::var("ATTACHMENT_ROOT").unwrap_or_else(|_| "storage".into());

            let reminder_scan_interval_secs = env::var("REMINDER_SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600);

            Config {
                project_name,
                log_level,
                log_file,
                database_url,
                host,
                port,
                civil_timezone_offset_hours,
                leave_approval_webhook_url,
                leave_approval_webhook_secret,
                leave_approval_webhook_timeout_secs,
                covers_forward_url,
                covers_forward_secret,
                leave_webhook_secret,
                availability_api_url,
                availability_api_timeout_secs,
                drive_client_id,
                drive_tenant_id,
                drive_io_timeout_secs,
                smtp_host,
                smtp_port,
                smtp_username,
                smtp_password,
                smtp_from,
                attachment_max_bytes,
                attachment_root,
                reminder_scan_interval_secs,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}