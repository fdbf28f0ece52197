//! Month proration primitives shared by the allowance rules.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::AllowanceResult;

/// Number of months in a full allowance year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// A partial month below the cutoff counts as half a month.
pub fn half_month() -> Decimal {
    Decimal::new(5, 1)
}

/// A month counted in full.
pub fn full_month() -> Decimal {
    Decimal::ONE
}

/// Converts months into an amount, rounded to cents with halves away from zero.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::allowance_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = allowance_amount(Decimal::from_str("10.5").unwrap(), Decimal::from(50));
/// assert_eq!(amount, Decimal::from(525));
///
/// let amount = allowance_amount(Decimal::from_str("0.5").unwrap(), Decimal::from_str("33.33").unwrap());
/// assert_eq!(amount, Decimal::from_str("16.67").unwrap());
/// ```
pub fn allowance_amount(months: Decimal, monthly_rate: Decimal) -> Decimal {
    (months * monthly_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps months at zero and prices them.
pub(crate) fn priced(months: Decimal, monthly_rate: Decimal) -> AllowanceResult {
    let months = months.max(Decimal::ZERO);
    AllowanceResult {
        months,
        amount: allowance_amount(months, monthly_rate),
    }
}

/// The whole-year entitlement.
pub(crate) fn full_year(monthly_rate: Decimal) -> AllowanceResult {
    priced(Decimal::from(MONTHS_PER_YEAR), monthly_rate)
}
