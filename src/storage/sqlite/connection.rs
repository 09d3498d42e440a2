use anyhow::{Context, Result};
use log::info;
use rusqlite::params;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the SQLite database.
///
/// One connection serves the whole process; the mutex keeps repository
/// handles `Send + Sync`. Callers are sequential (single-user desktop
/// system), so there is no contention to speak of.
#[derive(Clone)]
pub struct SqliteConnection {
    conn: Arc<Mutex<rusqlite::Connection>>,
    db_path: PathBuf,
}

impl SqliteConnection {
    /// Open (creating if necessary) the database under the given base
    /// directory and ensure the schema exists.
    pub fn new(base_directory: impl AsRef<Path>) -> Result<Self> {
        let base = base_directory.as_ref();
        fs::create_dir_all(base)
            .with_context(|| format!("failed to create data directory {}", base.display()))?;

        let db_path = base.join("tutorpay.db");
        let conn = rusqlite::Connection::open(&db_path)
            .with_context(|| format!("failed to open database {}", db_path.display()))?;

        let connection = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        };
        connection.initialize_schema()?;

        info!("Opened database at {}", connection.db_path.display());
        Ok(connection)
    }

    /// Open the database under the platform-local application data
    /// directory (`<local data dir>/TutorPay`).
    pub fn new_default() -> Result<Self> {
        let base = dirs::data_local_dir()
            .context("no local application data directory available")?
            .join("TutorPay");
        Self::new(base)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, rusqlite::Connection> {
        self.conn.lock().unwrap()
    }

    /// Create all tables if they do not exist and seed the default admin
    /// account so a fresh database is immediately usable.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock();

        // Cascades are performed explicitly by the deletion paths, so the
        // schema carries no ON DELETE clauses.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                fullname TEXT NOT NULL,
                password TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS learners (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                username TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS payroll (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                learner_id INTEGER NOT NULL,
                day INTEGER NOT NULL,
                attended INTEGER NOT NULL DEFAULT 0,
                rate INTEGER NOT NULL DEFAULT 0,
                UNIQUE(username, month, year, learner_id, day)
            );

            CREATE TABLE IF NOT EXISTS payroll_sum (
                username TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                learner_id INTEGER NOT NULL,
                sessions INTEGER NOT NULL DEFAULT 0,
                fee INTEGER NOT NULL DEFAULT 0,
                UNIQUE(username, month, year, learner_id)
            );",
        )
        .context("failed to create database schema")?;

        // Default admin account for first login
        conn.execute(
            "INSERT OR IGNORE INTO users (username, fullname, password) VALUES (?1, ?2, ?3)",
            params!["admin", "Administrator", "123"],
        )
        .context("failed to seed admin account")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_initialization_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let first = SqliteConnection::new(temp_dir.path()).unwrap();
        drop(first);

        // Re-opening the same directory must not fail or duplicate the seed.
        let second = SqliteConnection::new(temp_dir.path()).unwrap();
        let admins: i64 = second
            .lock()
            .query_row(
                "SELECT COUNT(*) FROM users WHERE username = 'admin'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(admins, 1);
    }
}
