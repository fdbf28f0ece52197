//! Allowance calculation results.
//!
//! This module contains the result of prorating a single allowance
//! ([`AllowanceResult`]) and the per-row output of a fee-sheet batch
//! ([`FeeLine`], [`AllowanceBatch`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, DataQualityWarning, DateState, EmployeeRecord};

/// Prorated months and the resulting allowance amount.
///
/// # Example
///
/// ```
/// use allowance_engine::models::AllowanceResult;
/// use rust_decimal::Decimal;
///
/// let result = AllowanceResult::zero();
/// assert_eq!(result.months, Decimal::ZERO);
/// assert_eq!(result.amount, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceResult {
    /// Active months in the target year, in half-month steps.
    pub months: Decimal,
    /// `months × monthly rate`, rounded to 2 decimal places.
    pub amount: Decimal,
}

impl AllowanceResult {
    /// No entitlement.
    pub fn zero() -> Self {
        Self {
            months: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

/// An allowance result together with the audit step that explains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceCalculation {
    /// The computed figures.
    #[serde(flatten)]
    pub result: AllowanceResult,
    /// How the figures were reached.
    pub audit_step: AuditStep,
}

/// The outcome of one fee-sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Inbound rule from the hire date.
    Inbound,
    /// Inbound rule from the transfer-in date.
    InboundTransfer,
    /// Outbound rule from hire to leave date.
    Resigned,
    /// Outbound rule from hire to transfer-out date.
    TransferredOut,
    /// Skipped: the employee ID occurs on several rows.
    DuplicateEmployeeId,
    /// Skipped: the date combination needs manual calculation.
    Unresolved,
}

impl RowStatus {
    /// Returns true if an allowance was computed for the row.
    pub fn is_computed(self) -> bool {
        !matches!(self, Self::DuplicateEmployeeId | Self::Unresolved)
    }

    /// Returns the exported text of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::InboundTransfer => "inbound_transfer",
            Self::Resigned => "resigned",
            Self::TransferredOut => "transferred_out",
            Self::DuplicateEmployeeId => "duplicate_employee_id",
            Self::Unresolved => "unresolved",
        }
    }
}

impl From<DateState> for RowStatus {
    fn from(state: DateState) -> Self {
        match state {
            DateState::Employed => Self::Inbound,
            DateState::TransferredIn => Self::InboundTransfer,
            DateState::Resigned => Self::Resigned,
            DateState::TransferredOut => Self::TransferredOut,
            DateState::Unresolved => Self::Unresolved,
        }
    }
}

/// A fee-sheet row with its computed allowance written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    /// The input row, unchanged.
    #[serde(flatten)]
    pub record: EmployeeRecord,
    /// Computed months; zero for skipped rows.
    pub months: Decimal,
    /// Computed allowance; zero for skipped rows.
    pub amount: Decimal,
    /// How the row was handled.
    pub status: RowStatus,
    /// Explanation of the figure, for computed rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Aggregate figures for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Sum of `amount` over all rows.
    pub total_amount: Decimal,
    /// Rows with a computed allowance.
    pub computed_rows: usize,
    /// Rows skipped as duplicate employee IDs.
    pub duplicate_rows: usize,
    /// Rows left for manual calculation.
    pub unresolved_rows: usize,
    /// Rows dropped before calculation because they could not be read.
    #[serde(default)]
    pub rejected_rows: usize,
}

/// The output of running the allowance calculator over a fee sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceBatch {
    /// The year the allowance was computed for.
    pub target_year: i32,
    /// One line per input row, in input order.
    pub lines: Vec<FeeLine>,
    /// Rows needing manual follow-up.
    pub warnings: Vec<DataQualityWarning>,
    /// Aggregate figures.
    pub summary: BatchSummary,
}

impl AllowanceBatch {
    /// Records rows that were rejected while reading the sheet. Their
    /// warnings are listed ahead of the batch's own.
    pub fn with_rejected(mut self, rejected: Vec<DataQualityWarning>) -> Self {
        self.summary.rejected_rows += rejected.len();
        self.warnings.splice(0..0, rejected);
        self
    }
}
