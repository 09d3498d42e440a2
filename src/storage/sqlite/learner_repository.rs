use anyhow::Result;
use log::{info, warn};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use super::connection::SqliteConnection;
use crate::domain::models::learner::Learner;
use crate::storage::traits::LearnerStorage;

/// SQLite-backed learner repository.
#[derive(Clone)]
pub struct LearnerRepository {
    connection: Arc<SqliteConnection>,
}

impl LearnerRepository {
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self { connection }
    }
}

impl LearnerStorage for LearnerRepository {
    fn insert_learner(&self, username: &str, name: &str) -> Result<Learner> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO learners (name, username) VALUES (?1, ?2)",
            params![name, username],
        )?;
        let learner = Learner {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            username: username.to_string(),
        };

        info!("Added learner '{}' (id {}) for {}", learner.name, learner.id, username);
        Ok(learner)
    }

    fn get_learner(&self, learner_id: i64) -> Result<Option<Learner>> {
        let conn = self.connection.lock();
        let learner = conn
            .query_row(
                "SELECT id, name, username FROM learners WHERE id = ?1",
                params![learner_id],
                |row| {
                    Ok(Learner {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        username: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(learner)
    }

    fn list_learners(&self, username: &str) -> Result<Vec<Learner>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, username FROM learners WHERE username = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok(Learner {
                id: row.get(0)?,
                name: row.get(1)?,
                username: row.get(2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn rename_learner(&self, learner_id: i64, name: &str) -> Result<bool> {
        let conn = self.connection.lock();
        let changed = conn.execute(
            "UPDATE learners SET name = ?1 WHERE id = ?2",
            params![name, learner_id],
        )?;
        if changed == 0 {
            warn!("Attempted to rename non-existent learner {}", learner_id);
            return Ok(false);
        }
        info!("Renamed learner {} to '{}'", learner_id, name);
        Ok(true)
    }

    fn delete_learner(&self, learner_id: i64) -> Result<bool> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        // Explicit cascade: the learner's day rows and summaries go with it.
        tx.execute(
            "DELETE FROM payroll WHERE learner_id = ?1",
            params![learner_id],
        )?;
        tx.execute(
            "DELETE FROM payroll_sum WHERE learner_id = ?1",
            params![learner_id],
        )?;
        let deleted = tx.execute("DELETE FROM learners WHERE id = ?1", params![learner_id])?;
        tx.commit()?;

        if deleted == 0 {
            warn!("Attempted to delete non-existent learner {}", learner_id);
            return Ok(false);
        }
        info!("Deleted learner {} and their ledgers", learner_id);
        Ok(true)
    }
}
