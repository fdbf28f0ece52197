//! Outbound allowance calculation.
//!
//! Covers employees who left the organization, either by resigning or by
//! transferring out. The leave-side cutoff comparison is strict (`day < cutoff`
//! gives half a month) while the join side is inclusive (`day <= cutoff` gives
//! a full month). Existing reconciliations depend on this asymmetry.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::AllowanceSettings;
use crate::error::EngineResult;
use crate::models::{AllowanceCalculation, AllowanceResult, AuditStep, parse_date};

use super::proration::{full_month, full_year, half_month, priced};

/// The rule identifier recorded in audit steps.
pub const OUTBOUND_RULE_ID: &str = "outbound_allowance";

/// Computes the allowance of an employee who joined on `join_date` and left
/// (resigned or transferred out) on `leave_date`.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::compute_outbound_allowance;
/// use allowance_engine::config::AllowanceSettings;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let calc = compute_outbound_allowance(
///     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     2024,
///     &AllowanceSettings::default(),
/// );
///
/// assert_eq!(calc.result.months, Decimal::from_str("2.5").unwrap());
/// assert_eq!(calc.result.amount, Decimal::from(125));
/// ```
pub fn compute_outbound_allowance(
    join_date: NaiveDate,
    leave_date: NaiveDate,
    target_year: i32,
    settings: &AllowanceSettings,
) -> AllowanceCalculation {
    let (result, case, reasoning) = prorate(join_date, leave_date, target_year, settings);

    let audit_step = AuditStep {
        rule_id: OUTBOUND_RULE_ID.to_string(),
        rule_name: "Outbound Allowance".to_string(),
        input: serde_json::json!({
            "join_date": join_date.to_string(),
            "leave_date": leave_date.to_string(),
            "target_year": target_year,
            "monthly_rate": settings.monthly_rate.normalize().to_string(),
            "cutoff_day": settings.cutoff_day
        }),
        output: serde_json::json!({
            "case": case,
            "months": result.months.normalize().to_string(),
            "amount": result.amount.normalize().to_string()
        }),
        reasoning,
    };

    AllowanceCalculation { result, audit_step }
}

/// Parses both dates as `YYYY-MM-DD` and computes the outbound allowance.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`](crate::error::EngineError::InvalidDate)
/// when either date is malformed.
pub fn compute_outbound_allowance_from_str(
    join_date: &str,
    leave_date: &str,
    target_year: i32,
    settings: &AllowanceSettings,
) -> EngineResult<AllowanceCalculation> {
    let join = parse_date(join_date)?;
    let leave = parse_date(leave_date)?;
    Ok(compute_outbound_allowance(join, leave, target_year, settings))
}

fn prorate(
    join_date: NaiveDate,
    leave_date: NaiveDate,
    target_year: i32,
    settings: &AllowanceSettings,
) -> (AllowanceResult, &'static str, String) {
    if leave_date.year() < target_year {
        return (
            AllowanceResult::zero(),
            "left_before_target_year",
            format!("Left {} before {} - no allowance", leave_date, target_year),
        );
    }

    if leave_date.year() > target_year {
        let result = full_year(settings.monthly_rate);
        return (
            result,
            "left_after_target_year",
            format!(
                "Left {} after {} - 12 months × ${} = ${}",
                leave_date,
                target_year,
                settings.monthly_rate.normalize(),
                result.amount.normalize()
            ),
        );
    }

    let (year_start, year_end) = year_bounds(target_year);
    let actual_join = join_date.max(year_start);
    let actual_leave = leave_date.min(year_end);

    if actual_join > actual_leave {
        return (
            AllowanceResult::zero(),
            "no_overlap",
            format!(
                "Joined {} after leaving {} - no allowance",
                join_date, leave_date
            ),
        );
    }

    let joined_in_target_year = join_date.year() == target_year;
    let cutoff = settings.cutoff_day;

    let join_fraction = if !joined_in_target_year || actual_join.day() <= cutoff {
        full_month()
    } else {
        half_month()
    };

    let leave_fraction = if actual_leave.day() < cutoff {
        half_month()
    } else {
        full_month()
    };

    let (months, case) = if actual_join.month() == actual_leave.month() {
        let months = if joined_in_target_year {
            if actual_join.day() <= cutoff && actual_leave.day() > cutoff {
                full_month()
            } else {
                half_month()
            }
        } else {
            leave_fraction
        };
        (months, "same_month")
    } else {
        let between = actual_leave.month() as i64 - actual_join.month() as i64 - 1;
        let between = Decimal::from(between.max(0));
        (join_fraction + between + leave_fraction, "spans_months")
    };

    let result = priced(months, settings.monthly_rate);
    let reasoning = format!(
        "{} to {} in {} (cutoff {}): {} months × ${} = ${}",
        actual_join,
        actual_leave,
        target_year,
        cutoff,
        result.months.normalize(),
        settings.monthly_rate.normalize(),
        result.amount.normalize()
    );

    (result, case, reasoning)
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    // Jan 1 and Dec 31 exist in every year chrono can represent.
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (start, end)
}
