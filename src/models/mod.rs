//! Core data models for the allowance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allowance;
mod audit;
mod budget;
mod dates;
mod employee;
mod organization;
mod period;
mod transfer;

pub use allowance::{
    AllowanceBatch, AllowanceCalculation, AllowanceResult, BatchSummary, FeeLine, RowStatus,
};
pub use audit::{AuditStep, DataQualityWarning, WarningCode};
pub use budget::{BudgetLedger, BudgetSummary, LedgerEntry};
pub use dates::{OptionalDate, parse_date};
pub use employee::{DateState, EmployeeRecord};
pub use organization::{ORG_DEPTH, OrgLevel, OrgPath, TransferLabel};
pub use period::{ReconciledPeriod, ReconciliationResult};
pub use transfer::{TransferEvent, sorted_by_date};
