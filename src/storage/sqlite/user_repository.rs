use anyhow::Result;
use log::{info, warn};
use rusqlite::{params, ErrorCode, OptionalExtension};
use std::sync::Arc;

use super::connection::SqliteConnection;
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;

/// SQLite-backed user account repository.
#[derive(Clone)]
pub struct UserRepository {
    connection: Arc<SqliteConnection>,
}

impl UserRepository {
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self { connection }
    }
}

/// True when the error is a UNIQUE constraint violation (username taken).
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        fullname: row.get(2)?,
        password: row.get(3)?,
    })
}

impl UserStorage for UserRepository {
    fn insert_user(&self, username: &str, fullname: &str, password: &str) -> Result<bool> {
        let conn = self.connection.lock();
        match conn.execute(
            "INSERT INTO users (username, fullname, password) VALUES (?1, ?2, ?3)",
            params![username, fullname, password],
        ) {
            Ok(_) => {
                info!("Registered user {}", username);
                Ok(true)
            }
            Err(e) if is_constraint_violation(&e) => {
                warn!("Username {} already taken", username);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let conn = self.connection.lock();
        let user = conn
            .query_row(
                "SELECT id, username, fullname, password FROM users
                 WHERE username = ?1 AND password = ?2",
                params![username, password],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connection.lock();
        let user = conn
            .query_row(
                "SELECT id, username, fullname, password FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.connection.lock();
        let mut stmt =
            conn.prepare("SELECT id, username, fullname, password FROM users ORDER BY id ASC")?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn update_password(&self, username: &str, new_password: &str) -> Result<bool> {
        let conn = self.connection.lock();
        let changed = conn.execute(
            "UPDATE users SET password = ?1 WHERE username = ?2",
            params![new_password, username],
        )?;
        if changed > 0 {
            info!("Updated password for {}", username);
        }
        Ok(changed > 0)
    }

    fn update_user(
        &self,
        user_id: i64,
        username: &str,
        fullname: &str,
        password: &str,
    ) -> Result<bool> {
        let conn = self.connection.lock();
        match conn.execute(
            "UPDATE users SET username = ?1, fullname = ?2, password = ?3 WHERE id = ?4",
            params![username, fullname, password, user_id],
        ) {
            Ok(changed) => {
                if changed > 0 {
                    info!("Updated user id {}", user_id);
                } else {
                    warn!("Attempted to update non-existent user id {}", user_id);
                }
                Ok(changed > 0)
            }
            Err(e) if is_constraint_violation(&e) => {
                warn!("Username {} already taken, user id {} not updated", username, user_id);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_user(&self, username: &str) -> Result<bool> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        // Explicit cascade: ledgers first, then learners, then the account.
        tx.execute("DELETE FROM payroll WHERE username = ?1", params![username])?;
        tx.execute(
            "DELETE FROM payroll_sum WHERE username = ?1",
            params![username],
        )?;
        tx.execute("DELETE FROM learners WHERE username = ?1", params![username])?;
        let deleted = tx.execute("DELETE FROM users WHERE username = ?1", params![username])?;
        tx.commit()?;

        if deleted == 0 {
            warn!("Attempted to delete non-existent user {}", username);
            return Ok(false);
        }
        info!("Deleted user {} and all their data", username);
        Ok(true)
    }

    fn delete_user_by_id(&self, user_id: i64) -> Result<bool> {
        let username: Option<String> = {
            let conn = self.connection.lock();
            conn.query_row(
                "SELECT username FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?
        };
        match username {
            Some(username) => self.delete_user(&username),
            None => Ok(false),
        }
    }
}
