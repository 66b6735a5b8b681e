pub mod error;
pub mod models;
pub mod pool;
pub mod repositories;

use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;

/// Connect to `database_url`, run all pending migrations, and publish the
/// connection via `pool::set`. Shape follows the teacher's `db::init`
/// entrypoint, but schema management is delegated to `sea-orm-migration`
/// rather than `sqlx::migrate!`.
pub async fn init(database_url: &str) {
    prepare_sqlite_path(database_url);
    let db = connect(database_url).await;
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    pool::set(db);
}

async fn connect(database_url: &str) -> DatabaseConnection {
    let mut opt = ConnectOptions::new(database_url);
    opt.connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(opt)
        .await
        .expect("failed to connect to the database")
}

/// Creates the parent directory and an empty file for file-backed sqlite
/// URLs of the form `sqlite://path/to/db.sqlite?mode=rwc`; a no-op for
/// `sqlite::memory:`.
fn prepare_sqlite_path(database_url: &str) {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return;
    };
    let path_str = rest.split('?').next().unwrap_or(rest);
    if path_str.is_empty() || path_str == ":memory:" {
        return;
    }
    let db_path = Path::new(path_str);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).expect("could not create database folder");
        }
    }
}

pub fn delete_database(database_path: &str) {
    let db_path = Path::new(database_path);
    if db_path.exists() {
        std::fs::remove_file(db_path).expect("failed to delete database file");
    }
}

/// In-memory sqlite database with all migrations applied, for service-level
/// tests — the sea-orm analogue of the teacher's `create_test_db`.
pub async fn create_test_db() -> DatabaseConnection {
    let db = connect("sqlite::memory:").await;
    Migrator::up(&db, None)
        .await
        .expect("failed to run test migrations");
    db
}
