//! Reporting period validation for transaction posting.
//!
//! - OPEN → every transaction type can post
//! - ADJUSTING → only Journal Entries can post
//! - CLOSED → nothing can post

use chrono::{Datelike, NaiveDate};
use folio_shared::types::{EntityId, ReportingPeriodId, TransactionType};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Reporting period status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts all postings.
    #[default]
    Open,
    /// Period accepts adjusting journal entries only.
    Adjusting,
    /// Period is locked.
    Closed,
}

/// The accounting period an entity currently posts into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Unique identifier.
    pub id: ReportingPeriodId,
    /// Entity this period belongs to.
    pub entity_id: EntityId,
    /// Calendar year the period is named after.
    pub calendar_year: i32,
    /// Ordinal of the period in the entity's history, used in transaction numbers.
    pub period_count: u32,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl ReportingPeriod {
    /// Creates an open period spanning `start..=end`.
    #[must_use]
    pub fn new(entity_id: EntityId, start: NaiveDate, end: NaiveDate, period_count: u32) -> Self {
        Self {
            id: ReportingPeriodId::new(),
            entity_id,
            calendar_year: start.year(),
            period_count,
            start,
            end,
            status: PeriodStatus::Open,
        }
    }

    /// Creates an open period covering a full calendar year.
    ///
    /// Returns `None` if the year is out of range.
    #[must_use]
    pub fn calendar(entity_id: EntityId, year: i32, period_count: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self::new(entity_id, start, end, period_count))
    }

    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    /// Checks the period status and date range for a posting.
    ///
    /// # Errors
    ///
    /// - `ClosedReportingPeriod` if the period is closed
    /// - `AdjustingReportingPeriod` if the period is adjusting and the type is not a Journal Entry
    /// - `InvalidTransactionDate` if `date` lies outside the period
    pub fn validate_posting(
        &self,
        transaction_type: TransactionType,
        date: NaiveDate,
    ) -> Result<(), LedgerError> {
        match self.status {
            PeriodStatus::Open => {}
            PeriodStatus::Adjusting if transaction_type == TransactionType::JournalEntry => {}
            PeriodStatus::Adjusting => {
                return Err(LedgerError::AdjustingReportingPeriod {
                    year: self.calendar_year,
                    transaction_type,
                });
            }
            PeriodStatus::Closed => {
                return Err(LedgerError::ClosedReportingPeriod(self.calendar_year));
            }
        }

        if self.contains(date) {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransactionDate {
                date,
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// Checks if a period status allows any posting at all.
#[must_use]
pub fn period_allows_posting(status: PeriodStatus) -> bool {
    !matches!(status, PeriodStatus::Closed)
}
