//! Inbound allowance calculation.
//!
//! Covers employees who are still in the organization at year end: either
//! continuously employed, or transferred in (in which case the transfer-in date
//! is the effective join date).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::AllowanceSettings;
use crate::error::EngineResult;
use crate::models::{AllowanceCalculation, AllowanceResult, AuditStep, parse_date};

use super::proration::{MONTHS_PER_YEAR, full_month, full_year, half_month, priced};

/// The rule identifier recorded in audit steps.
pub const INBOUND_RULE_ID: &str = "inbound_allowance";

/// Computes the allowance of an employee who joined (or transferred in) on
/// `effective_join_date` and is still present at the end of `target_year`.
///
/// - Joined after the target year: nothing.
/// - Joined before the target year: twelve months.
/// - Joined during the target year: the join month counts in full when the
///   join day is on or before the cutoff day, otherwise as half a month; every
///   later month counts in full.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::compute_inbound_allowance;
/// use allowance_engine::config::AllowanceSettings;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let join = NaiveDate::from_ymd_opt(2013, 2, 21).unwrap();
/// let calc = compute_inbound_allowance(join, 2013, &AllowanceSettings::default());
///
/// assert_eq!(calc.result.months, Decimal::from_str("10.5").unwrap());
/// assert_eq!(calc.result.amount, Decimal::from(525));
/// ```
pub fn compute_inbound_allowance(
    effective_join_date: NaiveDate,
    target_year: i32,
    settings: &AllowanceSettings,
) -> AllowanceCalculation {
    let join_year = effective_join_date.year();

    let (result, case, reasoning) = if join_year > target_year {
        (
            AllowanceResult::zero(),
            "not_yet_joined",
            format!(
                "Joined {} after {} - no allowance",
                effective_join_date, target_year
            ),
        )
    } else if join_year < target_year {
        let result = full_year(settings.monthly_rate);
        (
            result,
            "joined_before_target_year",
            format!(
                "Joined {} before {} - 12 months × ${} = ${}",
                effective_join_date,
                target_year,
                settings.monthly_rate.normalize(),
                result.amount.normalize()
            ),
        )
    } else {
        let first_month = first_month_fraction(effective_join_date.day(), settings.cutoff_day);
        let remaining = Decimal::from(MONTHS_PER_YEAR - effective_join_date.month());
        let result = priced(first_month + remaining, settings.monthly_rate);
        (
            result,
            "joined_in_target_year",
            format!(
                "Joined {} (day {} vs cutoff {}): {} + {} remaining months = {} months × ${} = ${}",
                effective_join_date,
                effective_join_date.day(),
                settings.cutoff_day,
                first_month.normalize(),
                remaining,
                result.months.normalize(),
                settings.monthly_rate.normalize(),
                result.amount.normalize()
            ),
        )
    };

    let audit_step = AuditStep {
        rule_id: INBOUND_RULE_ID.to_string(),
        rule_name: "Inbound Allowance".to_string(),
        input: serde_json::json!({
            "effective_join_date": effective_join_date.to_string(),
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

/// Parses `effective_join_date` as `YYYY-MM-DD` and computes the inbound allowance.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`](crate::error::EngineError::InvalidDate)
/// when the date is malformed.
pub fn compute_inbound_allowance_from_str(
    effective_join_date: &str,
    target_year: i32,
    settings: &AllowanceSettings,
) -> EngineResult<AllowanceCalculation> {
    let join = parse_date(effective_join_date)?;
    Ok(compute_inbound_allowance(join, target_year, settings))
}

/// Join-side fraction: on or before the cutoff counts in full.
fn first_month_fraction(day: u32, cutoff_day: u32) -> Decimal {
    if day <= cutoff_day {
        full_month()
    } else {
        half_month()
    }
}
