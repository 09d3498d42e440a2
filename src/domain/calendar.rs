//! Calendar-grid logic for the payroll tracker.
//!
//! This module partitions a month into ordered Monday-first weeks of seven
//! optional day slots. The same partition backs the interactive attendance
//! grid and the exported document, so day placement always matches between
//! the two.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Number of weekday slots per row, Monday through Sunday.
pub const DAYS_PER_WEEK: usize = 7;

/// Column headers for the Monday-first grid (Vietnamese weekday names,
/// "thứ hai" through "chủ nhật").
pub const WEEKDAY_HEADERS: [&str; DAYS_PER_WEEK] = ["T2", "T3", "T4", "T5", "T6", "T7", "CN"];

/// One populated slot in the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlot {
    /// Day of month, 1-based.
    pub day: u32,
    pub month: u32,
}

impl DaySlot {
    /// Display label in the `day/month` form used by the grid and export.
    pub fn label(&self) -> String {
        format!("{}/{}", self.day, self.month)
    }
}

/// A single grid row: seven optional slots, index 0 = Monday.
pub type Week = [Option<DaySlot>; DAYS_PER_WEEK];

/// Partition a month into ordered Monday-first weeks.
///
/// Day 1..N land in the slot matching their weekday; slots outside the
/// month stay `None`. A row is flushed when its Sunday slot is filled or
/// when the month's last day has been placed, so the result is 4 to 6
/// weeks long.
pub fn build_weeks(year: i32, month: u32) -> DomainResult<Vec<Week>> {
    let days = days_in_month(year, month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DomainError::InvalidDate { month })?;

    let mut weeks = Vec::new();
    let mut current: Week = [None; DAYS_PER_WEEK];
    let mut weekday = first.weekday().num_days_from_monday() as usize;

    for day in 1..=days {
        current[weekday] = Some(DaySlot { day, month });
        if weekday == DAYS_PER_WEEK - 1 || day == days {
            weeks.push(current);
            current = [None; DAYS_PER_WEEK];
            weekday = 0;
        } else {
            weekday += 1;
        }
    }

    Ok(weeks)
}

/// Number of days in a month, using Gregorian leap-year rules.
pub fn days_in_month(year: i32, month: u32) -> DomainResult<u32> {
    match month {
        2 => Ok(if is_leap_year(year) { 29 } else { 28 }),
        4 | 6 | 9 | 11 => Ok(30),
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        _ => Err(DomainError::InvalidDate { month }),
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
