use std::{env, fs, path::Path};
use util::paths::storage_root;

mod runner;

#[tokio::main]
async fn main() {
    let config = common::config::Config::init(".env");
    let url = config.database_url.clone();
    let db_path = sqlite_file_path(&url);
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(db_path.as_deref());
        }
        Some("fresh") => {
            remove_db_file(db_path.as_deref());
            create_db_dir(db_path.as_deref());
            runner::run_all_migrations(&url).await;
        }
        _ => {
            create_db_dir(db_path.as_deref());
            runner::run_all_migrations(&url).await;
        }
    }
}

/// Extract the filesystem path from a `sqlite://path?mode=rwc` URL, or
/// `None` for `sqlite::memory:` / non-sqlite URLs.
fn sqlite_file_path(url: &str) -> Option<String> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path.to_string())
    }
}

fn remove_db_file(path: Option<&str>) {
    let Some(path) = path else {
        println!("DATABASE_URL is not a file-backed sqlite path, nothing to delete");
        return;
    };
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }

    let root = storage_root();
    if root.exists() {
        fs::remove_dir_all(&root).expect("Failed to delete storage root");
        println!("Deleted storage root: {}", root.display());
    } else {
        println!("Storage root does not exist: {}", root.display());
    }
}

fn create_db_dir(path: Option<&str>) {
    let Some(path) = path else { return };
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
