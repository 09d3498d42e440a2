use crate::domain::models::payroll::{DayRecord, LedgerKey, Money, Summary};

/// Create the ledger for one learner-month. Every calendar day is
/// materialized up front, unattended with rate 0.
#[derive(Debug, Clone)]
pub struct CreateLedgerCommand {
    pub key: LedgerKey,
}

#[derive(Debug, Clone)]
pub struct CreateLedgerResult {
    pub key: LedgerKey,
    /// Number of day records materialized.
    pub days: u32,
}

/// Toggle one day's attendance flag.
#[derive(Debug, Clone)]
pub struct SetAttendanceCommand {
    pub key: LedgerKey,
    /// Day of month, 1-based.
    pub day: u32,
    pub attended: bool,
}

#[derive(Debug, Clone)]
pub struct SetAttendanceResult {
    /// The day record as written.
    pub record: DayRecord,
    /// The summary recomputed from the full record set.
    pub summary: Summary,
}

/// Apply a per-session rate to every currently-attended day.
#[derive(Debug, Clone)]
pub struct SetDefaultRateCommand {
    pub key: LedgerKey,
    pub rate: Money,
}

#[derive(Debug, Clone)]
pub struct SetDefaultRateResult {
    pub summary: Summary,
}

/// Delete a ledger: all day records and the summary together.
#[derive(Debug, Clone)]
pub struct DeleteLedgerCommand {
    pub key: LedgerKey,
}
