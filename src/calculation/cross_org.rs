//! Cross-organization transfer classification.

use crate::models::{OrgLevel, TransferEvent, TransferLabel};

/// Decides whether a transfer crosses the configured organization level.
///
/// Levels are compared top-down from level 1 through `level`. If all of them
/// are unchanged the transfer is internal at `level` and the employee's record
/// is not split; a difference at any of those levels crosses the boundary.
/// Levels below `level` are never consulted.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::classify_transfer;
/// use allowance_engine::models::{OrgLevel, OrgPath, OptionalDate, TransferEvent, TransferLabel};
/// use chrono::NaiveDate;
///
/// let event = TransferEvent {
///     employee_id: "E001".to_string(),
///     name: "Lin".to_string(),
///     hire_date: OptionalDate::ABSENT,
///     transfer_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///     before: OrgPath::new("Group", "Retail", "North", "Sales"),
///     after: OrgPath::new("Group", "Retail", "South", "Sales"),
/// };
///
/// let level_2 = OrgLevel::try_from(2).unwrap();
/// let level_3 = OrgLevel::try_from(3).unwrap();
/// assert_eq!(classify_transfer(level_2, &event), TransferLabel::Level2Internal);
/// assert_eq!(classify_transfer(level_3, &event), TransferLabel::CrossesConfiguredLevel);
/// ```
pub fn classify_transfer(level: OrgLevel, event: &TransferEvent) -> TransferLabel {
    if event.before.matches_through(&event.after, level) {
        TransferLabel::internal_at(level)
    } else {
        TransferLabel::CrossesConfiguredLevel
    }
}
