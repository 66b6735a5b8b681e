use once_cell::sync::OnceCell;
use sea_orm::DatabaseConnection;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Set the global DB connection once (usually in `main`).
pub fn set(db: DatabaseConnection) {
    DB_POOL
        .set(db)
        .unwrap_or_else(|_| panic!("DB_POOL already initialized"));
}

/// Get a clone of the shared global DB connection.
pub fn get() -> DatabaseConnection {
    DB_POOL.get().expect("DB_POOL is not initialized").clone()
}
