// src/db/store_db_conn.rs
use crate::error::Result;
use rusqlite::Connection;
use std::time::Duration;
use std::{env, fs, path::Path};

/// Open the configured store. `FV_STORE_DB` wins over `[paths].store_db`.
pub fn open_store_db() -> Result<Connection> {
    let config = crate::config::load()?;

    // Allow full test isolation via env vars
    let db_path = env::var("FV_STORE_DB").unwrap_or_else(|_| config.paths.store_db.clone());
    open_store_db_at(db_path)
}

pub fn open_store_db_at<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    if let Some(parent) = db_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path.as_ref())?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    tracing::debug!(path = %db_path.as_ref().display(), "opened store database");

    Ok(conn)
}
