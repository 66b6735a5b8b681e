mod api_error;
mod auth;
mod response;
mod routes;
mod state;

use common::config::Config;
use state::AppState;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = Config::init(".env");
    init_tracing(&config.log_level, &config.log_file);

    tracing::info!(project = %config.project_name, "starting backend");

    db::init(&config.database_url).await;
    let db = db::pool::get();
    let state = AppState::new(db);

    spawn_reminder_worker(state.clone(), config.reminder_scan_interval_secs);

    let app = routes::routes(state);

    let addr = SocketAddr::new(config.host.parse().expect("invalid HOST"), config.port);
    let listener = TcpListener::bind(addr).await.expect("failed to bind listener");

    tracing::info!(%addr, "{}-api running", config.project_name);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server error");
}

/// `tracing-subscriber` on stdout plus a rolling daily file appender, with a
/// `tracing-log` bridge so `log`-based crates in the dependency tree (sea-orm,
/// sqlx) render through the same pipeline as the workspace's own
/// `tracing::info!`/`warn!` calls.
fn init_tracing(log_level: &str, log_file_path: &str) {
    tracing_log::LogTracer::init().expect("failed to install log-to-tracing bridge");

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = std::path::Path::new(log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("logs"));
    std::fs::create_dir_all(log_dir).expect("failed to create log directory");
    let file_name = std::path::Path::new(log_file_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "api.log".into());
    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    // Leaked deliberately: the guard must outlive every tracing call for the
    // life of the process, which `main` cannot express without a global.
    Box::leak(Box::new(guard));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
}

/// Background sweep of pending sick leaves missing an attachment, per the
/// reminder/expiry state machine (spec §4.6). Runs for the lifetime of the
/// process; failures inside a single scan are logged by `run_reminder_scan`
/// itself and never stop the loop.
fn spawn_reminder_worker(state: AppState, interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            ticker.tick().await;
            let report = state.leave_manager.run_reminder_scan().await;
            tracing::info!(
                reminded = report.reminded,
                invalidated = report.invalidated,
                failed = report.failed,
                "reminder scan complete"
            );
        }
    });
}
