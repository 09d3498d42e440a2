use anyhow::Result;
use log::{debug, info};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use super::connection::SqliteConnection;
use crate::domain::models::payroll::{DayRecord, LedgerInfo, LedgerKey, Money, Summary};
use crate::storage::traits::PayrollStorage;

/// SQLite-backed payroll ledger repository.
///
/// One ledger spans a `payroll` row per calendar day plus one
/// `payroll_sum` row; every mutation commits both sides in a single
/// transaction.
#[derive(Clone)]
pub struct PayrollRepository {
    connection: Arc<SqliteConnection>,
}

impl PayrollRepository {
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self { connection }
    }
}

impl PayrollStorage for PayrollRepository {
    fn create_ledger(&self, key: &LedgerKey, days: &[DayRecord]) -> Result<bool> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM payroll
             WHERE username = ?1 AND month = ?2 AND year = ?3 AND learner_id = ?4",
            params![key.username, key.month, key.year, key.learner_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            // Dropping the transaction rolls back; nothing was written.
            return Ok(false);
        }

        for record in days {
            tx.execute(
                "INSERT INTO payroll (username, month, year, learner_id, day, attended, rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    key.username,
                    key.month,
                    key.year,
                    key.learner_id,
                    record.day,
                    record.attended,
                    record.rate
                ],
            )?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO payroll_sum (username, month, year, learner_id, sessions, fee)
             VALUES (?1, ?2, ?3, ?4, 0, 0)",
            params![key.username, key.month, key.year, key.learner_id],
        )?;
        tx.commit()?;

        info!(
            "Created ledger with {} day records for {} learner {} ({}/{})",
            days.len(),
            key.username,
            key.learner_id,
            key.month,
            key.year
        );
        Ok(true)
    }

    fn day_records(&self, key: &LedgerKey) -> Result<Vec<DayRecord>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT day, attended, rate FROM payroll
             WHERE username = ?1 AND month = ?2 AND year = ?3 AND learner_id = ?4
             ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(
            params![key.username, key.month, key.year, key.learner_id],
            |row| {
                Ok(DayRecord {
                    day: row.get(0)?,
                    attended: row.get(1)?,
                    rate: row.get(2)?,
                })
            },
        )?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(
            "Loaded {} day records for {} learner {} ({}/{})",
            records.len(),
            key.username,
            key.learner_id,
            key.month,
            key.year
        );
        Ok(records)
    }

    fn summary(&self, key: &LedgerKey) -> Result<Option<Summary>> {
        let conn = self.connection.lock();
        let summary = conn
            .query_row(
                "SELECT sessions, fee FROM payroll_sum
                 WHERE username = ?1 AND month = ?2 AND year = ?3 AND learner_id = ?4",
                params![key.username, key.month, key.year, key.learner_id],
                |row| {
                    Ok(Summary {
                        sessions: row.get(0)?,
                        fee: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(summary)
    }

    fn update_day(&self, key: &LedgerKey, record: &DayRecord, summary: &Summary) -> Result<bool> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        let changed = tx.execute(
            "UPDATE payroll SET attended = ?1, rate = ?2
             WHERE username = ?3 AND month = ?4 AND year = ?5 AND learner_id = ?6 AND day = ?7",
            params![
                record.attended,
                record.rate,
                key.username,
                key.month,
                key.year,
                key.learner_id,
                record.day
            ],
        )?;
        if changed == 0 {
            return Ok(false);
        }

        tx.execute(
            "INSERT OR REPLACE INTO payroll_sum (username, month, year, learner_id, sessions, fee)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key.username,
                key.month,
                key.year,
                key.learner_id,
                summary.sessions,
                summary.fee
            ],
        )?;
        tx.commit()?;

        info!(
            "Updated day {} (attended={}) for {} learner {} ({}/{})",
            record.day, record.attended, key.username, key.learner_id, key.month, key.year
        );
        Ok(true)
    }

    fn update_attended_rates(
        &self,
        key: &LedgerKey,
        rate: Money,
        summary: &Summary,
    ) -> Result<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE payroll SET rate = ?1
             WHERE username = ?2 AND month = ?3 AND year = ?4 AND learner_id = ?5
               AND attended = 1",
            params![rate, key.username, key.month, key.year, key.learner_id],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO payroll_sum (username, month, year, learner_id, sessions, fee)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key.username,
                key.month,
                key.year,
                key.learner_id,
                summary.sessions,
                summary.fee
            ],
        )?;
        tx.commit()?;

        info!(
            "Applied rate {} to attended days for {} learner {} ({}/{})",
            rate, key.username, key.learner_id, key.month, key.year
        );
        Ok(())
    }

    fn delete_ledger(&self, key: &LedgerKey) -> Result<bool> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;

        let days_deleted = tx.execute(
            "DELETE FROM payroll
             WHERE username = ?1 AND month = ?2 AND year = ?3 AND learner_id = ?4",
            params![key.username, key.month, key.year, key.learner_id],
        )?;
        let summaries_deleted = tx.execute(
            "DELETE FROM payroll_sum
             WHERE username = ?1 AND month = ?2 AND year = ?3 AND learner_id = ?4",
            params![key.username, key.month, key.year, key.learner_id],
        )?;
        tx.commit()?;

        let deleted = days_deleted > 0 || summaries_deleted > 0;
        if deleted {
            info!(
                "Deleted ledger ({} day rows) for {} learner {} ({}/{})",
                days_deleted, key.username, key.learner_id, key.month, key.year
            );
        }
        Ok(deleted)
    }

    fn list_ledgers(&self, username: &str) -> Result<Vec<LedgerInfo>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT p.month, p.year, p.learner_id, l.name
             FROM payroll p
             JOIN learners l ON p.learner_id = l.id
             WHERE p.username = ?1
             ORDER BY p.year DESC, p.month DESC",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok(LedgerInfo {
                month: row.get(0)?,
                year: row.get(1)?,
                learner_id: row.get(2)?,
                learner_name: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
