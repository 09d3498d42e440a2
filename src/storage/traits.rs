//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! All operations are synchronous: the tracker is a single-user desktop
//! system with exactly one caller at a time.

use anyhow::Result;

use crate::domain::models::learner::Learner;
use crate::domain::models::payroll::{DayRecord, LedgerInfo, LedgerKey, Money, Summary};
use crate::domain::models::user::User;

/// Interface for payroll ledger storage.
///
/// Every mutation that touches a day record also carries the recomputed
/// summary; implementations must commit both in one unit so a ledger is
/// never observable half-updated.
pub trait PayrollStorage: Send + Sync {
    /// Insert the full day-record set and a zero summary for a new ledger,
    /// all-or-nothing. Returns false (writing nothing) when a ledger for
    /// the key already exists.
    fn create_ledger(&self, key: &LedgerKey, days: &[DayRecord]) -> Result<bool>;

    /// All day records for a ledger, ordered by calendar day ascending.
    /// Empty when the ledger does not exist.
    fn day_records(&self, key: &LedgerKey) -> Result<Vec<DayRecord>>;

    /// The stored summary, or None when the ledger does not exist.
    fn summary(&self, key: &LedgerKey) -> Result<Option<Summary>>;

    /// Write one day record together with the recomputed summary.
    /// Returns false when the (key, day) row does not exist.
    fn update_day(&self, key: &LedgerKey, record: &DayRecord, summary: &Summary) -> Result<bool>;

    /// Overwrite the rate of every currently-attended day and store the
    /// recomputed summary, as one unit. Unattended days keep rate 0.
    fn update_attended_rates(&self, key: &LedgerKey, rate: Money, summary: &Summary)
        -> Result<()>;

    /// Remove all day records and the summary row together.
    /// Returns false when no ledger existed for the key.
    fn delete_ledger(&self, key: &LedgerKey) -> Result<bool>;

    /// Distinct ledgers belonging to a user, newest (year, month) first.
    fn list_ledgers(&self, username: &str) -> Result<Vec<LedgerInfo>>;
}

/// Interface for learner storage.
pub trait LearnerStorage: Send + Sync {
    /// Insert a learner for a user and return it with its assigned id.
    fn insert_learner(&self, username: &str, name: &str) -> Result<Learner>;

    /// Retrieve a specific learner by id.
    fn get_learner(&self, learner_id: i64) -> Result<Option<Learner>>;

    /// All learners belonging to a user, in creation order.
    fn list_learners(&self, username: &str) -> Result<Vec<Learner>>;

    /// Returns false when the learner does not exist.
    fn rename_learner(&self, learner_id: i64, name: &str) -> Result<bool>;

    /// Delete a learner and cascade to all of their ledgers, as one unit.
    /// Returns false when the learner does not exist.
    fn delete_learner(&self, learner_id: i64) -> Result<bool>;
}

/// Interface for user account storage.
pub trait UserStorage: Send + Sync {
    /// Insert-if-absent; returns false when the username is already taken.
    fn insert_user(&self, username: &str, fullname: &str, password: &str) -> Result<bool>;

    /// Look up a user by exact username/password pair.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>>;

    /// Retrieve a user by username.
    fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// All user accounts, in creation order.
    fn list_users(&self) -> Result<Vec<User>>;

    /// Returns false when no such user exists.
    fn update_password(&self, username: &str, new_password: &str) -> Result<bool>;

    /// Overwrite username, fullname and password of the account with the
    /// given row id. Returns false when the account does not exist or the
    /// new username collides with an existing one.
    fn update_user(&self, user_id: i64, username: &str, fullname: &str, password: &str)
        -> Result<bool>;

    /// Delete a user and cascade to their learners and ledgers, as one
    /// unit. Returns false when the user does not exist.
    fn delete_user(&self, username: &str) -> Result<bool>;

    /// Same cascade as [`UserStorage::delete_user`], addressed by row id.
    fn delete_user_by_id(&self, user_id: i64) -> Result<bool>;
}
