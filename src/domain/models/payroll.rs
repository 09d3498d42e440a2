use serde::{Deserialize, Serialize};

/// Integer currency amount in VNĐ. Formatting is a display concern, see
/// [`crate::domain::currency::format_currency`].
pub type Money = i64;

/// Identifies one ledger: one learner's attendance for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    pub username: String,
    pub learner_id: i64,
    pub month: u32,
    pub year: i32,
}

impl LedgerKey {
    pub fn new(username: impl Into<String>, learner_id: i64, month: u32, year: i32) -> Self {
        Self {
            username: username.into(),
            learner_id,
            month,
            year,
        }
    }
}

/// One calendar day's attendance flag and per-session rate.
///
/// A full month of these is materialized when the ledger is created; the
/// rate is 0 whenever the day is unattended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Day of month, 1-based.
    pub day: u32,
    pub attended: bool,
    pub rate: Money,
}

/// Derived aggregate for a ledger: attended session count and total fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub sessions: u32,
    pub fee: Money,
}

impl Summary {
    /// Recompute the aggregate from the full day-record set.
    pub fn derive(records: &[DayRecord]) -> Self {
        let attended = records.iter().filter(|r| r.attended);
        let mut sessions = 0;
        let mut fee = 0;
        for record in attended {
            sessions += 1;
            fee += record.rate;
        }
        Summary { sessions, fee }
    }
}

/// Catalogue entry for a user's ledger listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub month: u32,
    pub year: i32,
    pub learner_id: i64,
    pub learner_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_summary() {
        let records = vec![
            DayRecord { day: 1, attended: true, rate: 100 },
            DayRecord { day: 2, attended: false, rate: 0 },
            DayRecord { day: 3, attended: true, rate: 150 },
        ];
        let summary = Summary::derive(&records);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.fee, 250);
    }

    #[test]
    fn test_derive_summary_empty() {
        assert_eq!(Summary::derive(&[]), Summary::default());
    }
}
