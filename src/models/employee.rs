//! Employee roster rows.
//!
//! This module defines [`EmployeeRecord`], one row of an active, resigned or
//! fee-calculation roster, together with the date-state classification used
//! by the allowance batch.

use serde::{Deserialize, Serialize};

use super::{OptionalDate, OrgPath, TransferLabel};

/// A row of an employee roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Employee ID, unique within a clean roster.
    pub employee_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Organization the employee belongs to.
    #[serde(default)]
    pub org_path: OrgPath,
    /// The date the employee joined the company.
    #[serde(default)]
    pub hire_date: OptionalDate,
    /// The last working day, for resigned employees.
    #[serde(default)]
    pub leave_date: OptionalDate,
    /// The date the employee transferred out of this organization.
    #[serde(default)]
    pub transfer_out_date: OptionalDate,
    /// The date the employee transferred into this organization.
    #[serde(default)]
    pub transfer_in_date: OptionalDate,
    /// Cross-organization transfer annotation.
    #[serde(default)]
    pub cross_org_transfer: TransferLabel,
}

/// Which allowance rule a roster row falls under, decided by its populated dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateState {
    /// Hire date only: employed for the rest of the year.
    Employed,
    /// Hire and transfer-in dates: the transfer-in date is the effective join date.
    TransferredIn,
    /// Hire and leave dates: resigned.
    Resigned,
    /// Hire and transfer-out dates: moved to another organization.
    TransferredOut,
    /// Any other combination. Needs manual calculation.
    Unresolved,
}

impl EmployeeRecord {
    /// Creates a record with only an ID, name and organization.
    pub fn new(employee_id: impl Into<String>, name: impl Into<String>, org_path: OrgPath) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            org_path,
            ..Self::default()
        }
    }

    /// Classifies the row by which of its dates are populated.
    ///
    /// # Examples
    ///
    /// ```
    /// use allowance_engine::models::{DateState, EmployeeRecord, OptionalDate, OrgPath};
    /// use chrono::NaiveDate;
    ///
    /// let mut record = EmployeeRecord::new("E001", "Lin", OrgPath::default());
    /// record.hire_date = OptionalDate::present(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
    /// assert_eq!(record.date_state(), DateState::Employed);
    ///
    /// record.leave_date = OptionalDate::present(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    /// assert_eq!(record.date_state(), DateState::Resigned);
    /// ```
    pub fn date_state(&self) -> DateState {
        let hire = self.hire_date.is_present();
        let leave = self.leave_date.is_present();
        let out = self.transfer_out_date.is_present();
        let inbound = self.transfer_in_date.is_present();

        match (hire, leave, out, inbound) {
            (true, false, false, false) => DateState::Employed,
            (true, false, false, true) => DateState::TransferredIn,
            (true, true, false, false) => DateState::Resigned,
            (true, false, true, false) => DateState::TransferredOut,
            _ => DateState::Unresolved,
        }
    }
}
