//! Organizational transfer events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{OptionalDate, OrgPath};

/// One row of the transfer log: an employee moving between organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// The employee who moved.
    pub employee_id: String,
    /// Display name as recorded in the transfer log.
    #[serde(default)]
    pub name: String,
    /// Hire date as recorded in the transfer log, if exported.
    #[serde(default)]
    pub hire_date: OptionalDate,
    /// The effective date of the move.
    pub transfer_date: NaiveDate,
    /// Organization before the move.
    pub before: OrgPath,
    /// Organization after the move.
    pub after: OrgPath,
}

/// Returns the events of one employee ordered by transfer date.
///
/// The sort is stable: events on the same date keep their log order, so the
/// last one logged counts as the most recent.
pub fn sorted_by_date<'a>(events: impl IntoIterator<Item = &'a TransferEvent>) -> Vec<&'a TransferEvent> {
    let mut sorted: Vec<&TransferEvent> = events.into_iter().collect();
    sorted.sort_by_key(|event| event.transfer_date);
    sorted
}
