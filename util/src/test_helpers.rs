use common::config::Config;
use std::sync::Once;
use tempfile::TempDir;

/// Initializes the process-wide `Config` once with a temporary attachment
/// root and an in-memory database, for crates whose tests exercise code
/// that reads `Config::get()`. Safe to call from every test; only the first
/// call takes effect (the config is a process-wide singleton, same as in
/// the running service).
pub fn init_test_config() -> TempDir {
    static ONCE: Once = Once::new();
    let dir = TempDir::new().expect("failed to create tempdir");
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        format!(
            "ATTACHMENT_ROOT={}\nDATABASE_URL=sqlite::memory:\n",
            dir.path().join("storage").display()
        ),
    )
    .expect("failed to write test .env");

    ONCE.call_once(|| {
        Config::init(env_path.to_str().unwrap());
    });

    dir
}
