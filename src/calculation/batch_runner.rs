//! Fee-sheet batch calculation.
//!
//! Runs the inbound or outbound allowance rule over every row of a fee sheet.
//! The rule is chosen by which dates a row has populated (see
//! [`DateState`]). Rows that cannot be calculated automatically are kept in
//! the output with a zero figure and reported as [`DataQualityWarning`]s.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::AllowanceSettings;
use crate::models::{
    AllowanceBatch, AllowanceCalculation, BatchSummary, DataQualityWarning, DateState,
    EmployeeRecord, FeeLine, RowStatus, WarningCode,
};

use super::inbound_allowance::compute_inbound_allowance;
use super::outbound_allowance::compute_outbound_allowance;

/// Computes the allowance of every row for `target_year`.
///
/// Output lines follow input order. Any employee ID occurring on more than one
/// row is skipped on all of its rows, since there is no way to tell which row
/// is authoritative.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::run_allowance_batch;
/// use allowance_engine::config::AllowanceSettings;
/// use allowance_engine::models::{EmployeeRecord, OptionalDate, OrgPath, RowStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut row = EmployeeRecord::new("E001", "Lin", OrgPath::default());
/// row.hire_date = OptionalDate::present(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
///
/// let batch = run_allowance_batch(&[row], 2025, &AllowanceSettings::default());
/// assert_eq!(batch.lines[0].status, RowStatus::Inbound);
/// assert_eq!(batch.summary.total_amount, Decimal::from(600));
/// ```
pub fn run_allowance_batch(
    rows: &[EmployeeRecord],
    target_year: i32,
    settings: &AllowanceSettings,
) -> AllowanceBatch {
    info!(rows = rows.len(), target_year, "Running allowance batch");

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *occurrences.entry(row.employee_id.trim()).or_default() += 1;
    }

    let mut lines = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();
    let mut summary = BatchSummary::default();

    for row in rows {
        let id = row.employee_id.trim();
        let count = occurrences.get(id).copied().unwrap_or(0);

        let line = if count > 1 {
            summary.duplicate_rows += 1;
            warnings.push(DataQualityWarning::new(
                WarningCode::DuplicateEmployeeId,
                id,
                format!("employee ID appears on {} rows; allowance not calculated", count),
            ));
            skipped_line(row, RowStatus::DuplicateEmployeeId)
        } else {
            match calculate_row(row, target_year, settings) {
                Some((status, calc)) => {
                    summary.computed_rows += 1;
                    summary.total_amount += calc.result.amount;
                    debug!(
                        employee_id = id,
                        status = status.as_str(),
                        months = %calc.result.months,
                        amount = %calc.result.amount,
                        "Row calculated"
                    );
                    FeeLine {
                        record: row.clone(),
                        months: calc.result.months,
                        amount: calc.result.amount,
                        status,
                        reasoning: Some(calc.audit_step.reasoning),
                    }
                }
                None => {
                    summary.unresolved_rows += 1;
                    warnings.push(DataQualityWarning::new(
                        WarningCode::UnresolvedDateState,
                        id,
                        "date combination matches no automatic rule; calculate manually",
                    ));
                    skipped_line(row, RowStatus::Unresolved)
                }
            }
        };
        lines.push(line);
    }

    if !warnings.is_empty() {
        warn!(
            duplicates = summary.duplicate_rows,
            unresolved = summary.unresolved_rows,
            "Allowance batch has rows needing manual follow-up"
        );
    }
    info!(
        computed = summary.computed_rows,
        total_amount = %summary.total_amount,
        "Allowance batch completed"
    );

    AllowanceBatch {
        target_year,
        lines,
        warnings,
        summary,
    }
}

/// Dispatches one row to its rule, or `None` when its dates match no rule.
fn calculate_row(
    row: &EmployeeRecord,
    target_year: i32,
    settings: &AllowanceSettings,
) -> Option<(RowStatus, AllowanceCalculation)> {
    let state = row.date_state();
    let hire = row.hire_date.get()?;

    let calc = match state {
        DateState::Employed => compute_inbound_allowance(hire, target_year, settings),
        DateState::TransferredIn => {
            compute_inbound_allowance(row.transfer_in_date.get()?, target_year, settings)
        }
        DateState::Resigned => {
            compute_outbound_allowance(hire, row.leave_date.get()?, target_year, settings)
        }
        DateState::TransferredOut => {
            compute_outbound_allowance(hire, row.transfer_out_date.get()?, target_year, settings)
        }
        DateState::Unresolved => return None,
    };

    Some((RowStatus::from(state), calc))
}

fn skipped_line(row: &EmployeeRecord, status: RowStatus) -> FeeLine {
    FeeLine {
        record: row.clone(),
        months: Decimal::ZERO,
        amount: Decimal::ZERO,
        status,
        reasoning: None,
    }
}
