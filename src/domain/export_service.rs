//! Export document assembly.
//!
//! This module builds the renderer-agnostic payroll document consumed by
//! the PDF exporter. It only computes data: the week grid (reusing the
//! exact partition shown on screen), per-day attendance marks and the
//! formatted summary lines. Drawing is the renderer's concern.

use chrono::Local;
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::calendar::{self, DAYS_PER_WEEK, WEEKDAY_HEADERS};
use crate::domain::currency::format_currency;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::payroll::{LedgerKey, Money, Summary};
use crate::storage::sqlite::{LearnerRepository, PayrollRepository, SqliteConnection};
use crate::storage::traits::{LearnerStorage, PayrollStorage};

/// Title used when the learner can no longer be resolved.
const FALLBACK_TITLE: &str = "Bảng Lương";

/// One populated grid cell of the export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportCell {
    /// `day/month` label, identical to the on-screen grid.
    pub label: String,
    /// Whether the day gets a check mark.
    pub attended: bool,
}

/// Renderer-agnostic payroll document.
///
/// The week rows use the same partition as the interactive grid, so day
/// placement in the exported artifact matches the screen exactly.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub title: String,
    pub learner_name: String,
    pub month: u32,
    pub year: i32,
    /// Monday-first column headers.
    pub weekday_headers: [&'static str; DAYS_PER_WEEK],
    /// One row per week; `None` marks slots outside the month.
    pub weeks: Vec<Vec<Option<ExportCell>>>,
    pub sessions: u32,
    pub fee: Money,
    /// "Tổng buổi: {sessions}"
    pub sessions_line: String,
    /// "Tổng phí: {formatted fee}"
    pub fee_line: String,
    /// Timestamped default file name offered in the save dialog.
    pub suggested_file_name: String,
}

/// Service assembling export documents from ledger state.
#[derive(Clone)]
pub struct ExportService {
    payroll_repository: PayrollRepository,
    learner_repository: LearnerRepository,
}

impl ExportService {
    /// Create a new ExportService
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self {
            payroll_repository: PayrollRepository::new(connection.clone()),
            learner_repository: LearnerRepository::new(connection),
        }
    }

    /// Build the export document for a ledger. Fails with `NotFound` when
    /// the ledger does not exist; an unresolvable learner only downgrades
    /// the title.
    pub fn build_document(&self, key: &LedgerKey) -> DomainResult<ExportDocument> {
        let records = self.payroll_repository.day_records(key)?;
        if records.is_empty() {
            return Err(DomainError::NotFound);
        }
        let summary = self
            .payroll_repository
            .summary(key)?
            .unwrap_or_else(Summary::default);

        let learner_name = self
            .learner_repository
            .get_learner(key.learner_id)?
            .map(|learner| learner.name)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        let attended: HashSet<u32> = records
            .iter()
            .filter(|r| r.attended)
            .map(|r| r.day)
            .collect();

        let weeks = calendar::build_weeks(key.year, key.month)?
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|slot| {
                        slot.map(|slot| ExportCell {
                            label: slot.label(),
                            attended: attended.contains(&slot.day),
                        })
                    })
                    .collect()
            })
            .collect();

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let document = ExportDocument {
            title: format!("{} Tháng {}/{}", learner_name, key.month, key.year),
            learner_name,
            month: key.month,
            year: key.year,
            weekday_headers: WEEKDAY_HEADERS,
            weeks,
            sessions: summary.sessions,
            fee: summary.fee,
            sessions_line: format!("Tổng buổi: {}", summary.sessions),
            fee_line: format!("Tổng phí: {}", format_currency(summary.fee)),
            suggested_file_name: format!(
                "Payroll_{}_{}_{}_{}.pdf",
                key.username, key.month, key.year, timestamp
            ),
        };

        info!(
            "Built export document for {} learner {} ({}/{}): {} sessions, fee {}",
            key.username, key.learner_id, key.month, key.year, summary.sessions, summary.fee
        );
        Ok(document)
    }
}
