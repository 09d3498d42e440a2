//! Payroll ledger domain logic.
//!
//! A ledger is the attendance and fee record set for one learner in one
//! calendar month: one day record per calendar day, materialized in full
//! when the ledger is created, plus a summary derived from those records.
//! Every mutation re-derives the summary from the complete record set and
//! commits it together with the triggering write.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::calendar;
use crate::domain::commands::payroll::{
    CreateLedgerCommand, CreateLedgerResult, DeleteLedgerCommand, SetAttendanceCommand,
    SetAttendanceResult, SetDefaultRateCommand, SetDefaultRateResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::payroll::{DayRecord, LedgerInfo, LedgerKey, Money, Summary};
use crate::storage::sqlite::{PayrollRepository, SqliteConnection};
use crate::storage::traits::PayrollStorage;

/// Service for managing payroll ledgers.
#[derive(Clone)]
pub struct PayrollService {
    payroll_repository: PayrollRepository,
}

impl PayrollService {
    /// Create a new PayrollService
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self {
            payroll_repository: PayrollRepository::new(connection),
        }
    }

    /// Create a ledger, materializing one unattended day record per
    /// calendar day and a zero summary in a single atomic write.
    ///
    /// A second create for the same key fails with `AlreadyExists` and
    /// changes nothing.
    pub fn create_ledger(&self, command: CreateLedgerCommand) -> DomainResult<CreateLedgerResult> {
        let key = command.key;
        info!(
            "Creating ledger for {} learner {} ({}/{})",
            key.username, key.learner_id, key.month, key.year
        );

        // Validated before any write; also guarantees days_in_month below.
        let days = calendar::days_in_month(key.year, key.month)?;
        let records: Vec<DayRecord> = (1..=days)
            .map(|day| DayRecord {
                day,
                attended: false,
                rate: 0,
            })
            .collect();

        if !self.payroll_repository.create_ledger(&key, &records)? {
            warn!(
                "Ledger already exists for {} learner {} ({}/{})",
                key.username, key.learner_id, key.month, key.year
            );
            return Err(DomainError::AlreadyExists);
        }

        Ok(CreateLedgerResult { key, days })
    }

    /// All day records of a ledger, ordered by calendar day ascending.
    /// Empty when no ledger exists for the key.
    pub fn day_records(&self, key: &LedgerKey) -> DomainResult<Vec<DayRecord>> {
        Ok(self.payroll_repository.day_records(key)?)
    }

    /// The ledger summary. Absence is a valid empty state for display, so
    /// a missing ledger yields `{0, 0}` rather than an error.
    pub fn summary(&self, key: &LedgerKey) -> DomainResult<Summary> {
        Ok(self.payroll_repository.summary(key)?.unwrap_or_default())
    }

    /// The rate applied when a day is marked attended: the maximum rate
    /// present across all day records of the ledger.
    ///
    /// There is no stored default rate; the value is inferred from
    /// whatever was last written to the attended days. A ledger whose
    /// attended days were all un-attended again therefore infers 0 until
    /// the next rate update.
    pub fn effective_rate(&self, key: &LedgerKey) -> DomainResult<Money> {
        let records = self.payroll_repository.day_records(key)?;
        Ok(Self::max_rate(&records))
    }

    /// Toggle one day's attendance. Attending applies the effective rate
    /// to the day; un-attending resets its rate to 0. The summary is
    /// recomputed from the full record set and committed with the day
    /// write.
    pub fn set_attendance(
        &self,
        command: SetAttendanceCommand,
    ) -> DomainResult<SetAttendanceResult> {
        let SetAttendanceCommand { key, day, attended } = command;

        let mut records = self.payroll_repository.day_records(&key)?;
        let effective_rate = Self::max_rate(&records);

        let record = records
            .iter_mut()
            .find(|r| r.day == day)
            .ok_or_else(|| {
                warn!(
                    "No day {} in ledger for {} learner {} ({}/{})",
                    day, key.username, key.learner_id, key.month, key.year
                );
                DomainError::NotFound
            })?;
        record.attended = attended;
        record.rate = if attended { effective_rate } else { 0 };
        let record = record.clone();

        let summary = Summary::derive(&records);
        if !self.payroll_repository.update_day(&key, &record, &summary)? {
            return Err(DomainError::NotFound);
        }

        info!(
            "Day {} set to attended={} for {} learner {} ({}/{}): {} sessions, fee {}",
            day, attended, key.username, key.learner_id, key.month, key.year,
            summary.sessions, summary.fee
        );
        Ok(SetAttendanceResult { record, summary })
    }

    /// Apply a per-session rate to every currently-attended day and
    /// recompute the summary (session count unchanged, fee = sessions ×
    /// rate). Unattended days keep rate 0 until they are next attended.
    pub fn set_default_rate(
        &self,
        command: SetDefaultRateCommand,
    ) -> DomainResult<SetDefaultRateResult> {
        let SetDefaultRateCommand { key, rate } = command;
        if rate < 0 {
            return Err(DomainError::InvalidRate { rate });
        }

        let records = self.payroll_repository.day_records(&key)?;
        if records.is_empty() {
            warn!(
                "No ledger for {} learner {} ({}/{})",
                key.username, key.learner_id, key.month, key.year
            );
            return Err(DomainError::NotFound);
        }

        let sessions = records.iter().filter(|r| r.attended).count() as u32;
        let summary = Summary {
            sessions,
            fee: Money::from(sessions) * rate,
        };
        self.payroll_repository
            .update_attended_rates(&key, rate, &summary)?;

        info!(
            "Rate {} applied for {} learner {} ({}/{}): {} sessions, fee {}",
            rate, key.username, key.learner_id, key.month, key.year,
            summary.sessions, summary.fee
        );
        Ok(SetDefaultRateResult { summary })
    }

    /// Delete a ledger: all day records and the summary row together.
    pub fn delete_ledger(&self, command: DeleteLedgerCommand) -> DomainResult<()> {
        let key = command.key;
        if !self.payroll_repository.delete_ledger(&key)? {
            warn!(
                "No ledger to delete for {} learner {} ({}/{})",
                key.username, key.learner_id, key.month, key.year
            );
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// All ledgers of a user, newest (year, month) first.
    pub fn list_ledgers(&self, username: &str) -> DomainResult<Vec<LedgerInfo>> {
        Ok(self.payroll_repository.list_ledgers(username)?)
    }

    /// Filter a ledger catalogue by a case-insensitive query matched
    /// against the learner name or the `month/year` form.
    pub fn filter_ledgers(entries: &[LedgerInfo], query: &str) -> Vec<LedgerInfo> {
        let query = query.to_lowercase();
        entries
            .iter()
            .filter(|entry| {
                entry.learner_name.to_lowercase().contains(&query)
                    || format!("{}/{}", entry.month, entry.year).contains(&query)
            })
            .cloned()
            .collect()
    }

    fn max_rate(records: &[DayRecord]) -> Money {
        records.iter().map(|r| r.rate).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learner_service::LearnerService;
    use crate::domain::commands::learner::CreateLearnerCommand;
    use tempfile::{tempdir, TempDir};

    fn setup_test() -> (PayrollService, LearnerService, LedgerKey, TempDir) {
        let temp_dir = tempdir().unwrap();
        let connection = Arc::new(SqliteConnection::new(temp_dir.path()).unwrap());
        let payroll_service = PayrollService::new(connection.clone());
        let learner_service = LearnerService::new(connection);

        let learner = learner_service
            .create_learner(CreateLearnerCommand {
                username: "admin".to_string(),
                name: "An".to_string(),
            })
            .unwrap()
            .learner;
        let key = LedgerKey::new("admin", learner.id, 7, 2024);
        (payroll_service, learner_service, key, temp_dir)
    }

    /// Summary invariant: sessions == count(attended), fee == sum of
    /// attended rates. Checked after every mutation in these tests.
    fn assert_summary_consistent(service: &PayrollService, key: &LedgerKey) {
        let records = service.day_records(key).unwrap();
        let derived = Summary::derive(&records);
        assert_eq!(service.summary(key).unwrap(), derived);
    }

    #[test]
    fn test_create_ledger_materializes_full_month() {
        let (service, _learners, key, _tmp) = setup_test();
        let result = service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        assert_eq!(result.days, 31);

        let records = service.day_records(&key).unwrap();
        assert_eq!(records.len(), 31);
        assert_eq!(records.first().unwrap().day, 1);
        assert_eq!(records.last().unwrap().day, 31);
        assert!(records.iter().all(|r| !r.attended && r.rate == 0));
        assert_eq!(service.summary(&key).unwrap(), Summary::default());
    }

    #[test]
    fn test_create_ledger_twice_is_rejected() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 3,
                attended: true,
            })
            .unwrap();

        let err = service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists));

        // Nothing changed on the failed second create.
        let records = service.day_records(&key).unwrap();
        assert_eq!(records.len(), 31);
        assert!(records.iter().find(|r| r.day == 3).unwrap().attended);
        assert_summary_consistent(&service, &key);
    }

    #[test]
    fn test_create_ledger_invalid_month() {
        let (service, _learners, key, _tmp) = setup_test();
        let bad_key = LedgerKey::new(key.username.clone(), key.learner_id, 13, 2024);
        let err = service
            .create_ledger(CreateLedgerCommand { key: bad_key.clone() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate { month: 13 }));
        assert!(service.day_records(&bad_key).unwrap().is_empty());
    }

    #[test]
    fn test_attendance_with_no_rate_counts_sessions_at_zero_fee() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();

        assert_eq!(service.effective_rate(&key).unwrap(), 0);
        let result = service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 5,
                attended: true,
            })
            .unwrap();
        assert_eq!(result.record.rate, 0);
        assert_eq!(result.summary, Summary { sessions: 1, fee: 0 });
        assert_summary_consistent(&service, &key);
    }

    #[test]
    fn test_rate_update_then_new_attendance_infers_rate() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        for day in [1, 2, 3] {
            service
                .set_attendance(SetAttendanceCommand {
                    key: key.clone(),
                    day,
                    attended: true,
                })
                .unwrap();
            assert_summary_consistent(&service, &key);
        }

        let result = service
            .set_default_rate(SetDefaultRateCommand {
                key: key.clone(),
                rate: 100,
            })
            .unwrap();
        assert_eq!(result.summary, Summary { sessions: 3, fee: 300 });
        assert_summary_consistent(&service, &key);

        // The new day picks up the rate through max-rate inference.
        assert_eq!(service.effective_rate(&key).unwrap(), 100);
        let result = service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 10,
                attended: true,
            })
            .unwrap();
        assert_eq!(result.record.rate, 100);
        assert_eq!(result.summary, Summary { sessions: 4, fee: 400 });
        assert_summary_consistent(&service, &key);
    }

    #[test]
    fn test_unattending_resets_rate_and_inference() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 1,
                attended: true,
            })
            .unwrap();
        service
            .set_default_rate(SetDefaultRateCommand {
                key: key.clone(),
                rate: 150,
            })
            .unwrap();

        // Un-attending the only attended day drops every stored rate back
        // to 0, so the inferred rate silently becomes 0 as well.
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 1,
                attended: false,
            })
            .unwrap();
        assert_summary_consistent(&service, &key);
        assert_eq!(service.effective_rate(&key).unwrap(), 0);

        let result = service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 2,
                attended: true,
            })
            .unwrap();
        assert_eq!(result.record.rate, 0);
        assert_eq!(result.summary, Summary { sessions: 1, fee: 0 });
    }

    #[test]
    fn test_negative_rate_rejected_without_side_effects() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 4,
                attended: true,
            })
            .unwrap();
        service
            .set_default_rate(SetDefaultRateCommand {
                key: key.clone(),
                rate: 200,
            })
            .unwrap();

        let before = service.day_records(&key).unwrap();
        let err = service
            .set_default_rate(SetDefaultRateCommand {
                key: key.clone(),
                rate: -1,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRate { rate: -1 }));
        assert_eq!(service.day_records(&key).unwrap(), before);
        assert_eq!(service.summary(&key).unwrap(), Summary { sessions: 1, fee: 200 });
    }

    #[test]
    fn test_rate_update_leaves_unattended_days_at_zero() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 7,
                attended: true,
            })
            .unwrap();
        service
            .set_default_rate(SetDefaultRateCommand {
                key: key.clone(),
                rate: 120_000,
            })
            .unwrap();

        let records = service.day_records(&key).unwrap();
        for record in &records {
            if record.day == 7 {
                assert_eq!(record.rate, 120_000);
            } else {
                assert_eq!(record.rate, 0);
            }
        }
    }

    #[test]
    fn test_set_attendance_unknown_day() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        let err = service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 32,
                attended: true,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn test_set_default_rate_without_ledger() {
        let (service, _learners, key, _tmp) = setup_test();
        let err = service
            .set_default_rate(SetDefaultRateCommand { key, rate: 100 })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn test_delete_ledger_then_summary_is_empty() {
        let (service, _learners, key, _tmp) = setup_test();
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .set_attendance(SetAttendanceCommand {
                key: key.clone(),
                day: 1,
                attended: true,
            })
            .unwrap();

        service
            .delete_ledger(DeleteLedgerCommand { key: key.clone() })
            .unwrap();
        assert!(service.day_records(&key).unwrap().is_empty());
        // Absence is an empty state, not an error.
        assert_eq!(service.summary(&key).unwrap(), Summary::default());

        let err = service
            .delete_ledger(DeleteLedgerCommand { key: key.clone() })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn test_deleting_one_month_leaves_other_months_alone() {
        let (service, _learners, key, _tmp) = setup_test();
        let august = LedgerKey::new(key.username.clone(), key.learner_id, 8, 2024);
        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .create_ledger(CreateLedgerCommand { key: august.clone() })
            .unwrap();

        service
            .delete_ledger(DeleteLedgerCommand { key: key.clone() })
            .unwrap();
        assert_eq!(service.day_records(&august).unwrap().len(), 31);
    }

    #[test]
    fn test_list_and_filter_ledgers() {
        let (service, learners, key, _tmp) = setup_test();
        let binh = learners
            .create_learner(CreateLearnerCommand {
                username: "admin".to_string(),
                name: "Bình".to_string(),
            })
            .unwrap()
            .learner;

        service
            .create_ledger(CreateLedgerCommand { key: key.clone() })
            .unwrap();
        service
            .create_ledger(CreateLedgerCommand {
                key: LedgerKey::new("admin", binh.id, 9, 2024),
            })
            .unwrap();

        let entries = service.list_ledgers("admin").unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first.
        assert_eq!(entries[0].month, 9);
        assert_eq!(entries[1].month, 7);

        let by_name = PayrollService::filter_ledgers(&entries, "bình");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].learner_id, binh.id);

        let by_month = PayrollService::filter_ledgers(&entries, "7/2024");
        assert_eq!(by_month.len(), 1);
        assert_eq!(by_month[0].month, 7);

        assert!(PayrollService::filter_ledgers(&entries, "nope").is_empty());
    }
}
