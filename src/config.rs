use std::path::PathBuf;

use sqlx::sqlite::SqliteConnectOptions;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Persist built zones even when they fail zone-level validation
    /// (no SOA, several SOAs).
    pub allow_incomplete: bool,
}

impl AppConfig {
    /// Connection options for the configured database file.
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true)
            .foreign_keys(true)
    }
}
