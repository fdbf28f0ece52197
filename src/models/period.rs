//! Reconciled membership periods.

use serde::{Deserialize, Serialize};

use super::{EmployeeRecord, OptionalDate, OrgPath, TransferLabel};

/// One employee's membership of one organization during the year.
///
/// Created by the roster reconciler and never mutated afterwards. An employee
/// yields two periods when their latest transfer crossed the configured
/// organization level, otherwise one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledPeriod {
    /// Employee ID.
    pub employee_id: String,
    /// Display name.
    pub name: String,
    /// Organization valid during this period.
    pub org_path: OrgPath,
    /// Hire date.
    pub hire_date: OptionalDate,
    /// Leave date, for resigned employees.
    pub leave_date: OptionalDate,
    /// Set on the "before" half of a split.
    pub transfer_out_date: OptionalDate,
    /// Set on the "after" half of a split.
    pub transfer_in_date: OptionalDate,
    /// Cross-organization annotation.
    pub cross_org_transfer: TransferLabel,
}

impl ReconciledPeriod {
    /// The date membership of this organization began: transfer-in, else hire.
    pub fn period_start(&self) -> OptionalDate {
        self.transfer_in_date.or(self.hire_date)
    }

    /// The date membership of this organization ended: transfer-out, else leave.
    pub fn period_end(&self) -> OptionalDate {
        self.transfer_out_date.or(self.leave_date)
    }
}

impl From<EmployeeRecord> for ReconciledPeriod {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            name: record.name,
            org_path: record.org_path,
            hire_date: record.hire_date,
            leave_date: record.leave_date,
            transfer_out_date: record.transfer_out_date,
            transfer_in_date: record.transfer_in_date,
            cross_org_transfer: record.cross_org_transfer,
        }
    }
}

/// Reconciled periods feed straight into the allowance batch.
impl From<ReconciledPeriod> for EmployeeRecord {
    fn from(period: ReconciledPeriod) -> Self {
        Self {
            employee_id: period.employee_id,
            name: period.name,
            org_path: period.org_path,
            hire_date: period.hire_date,
            leave_date: period.leave_date,
            transfer_out_date: period.transfer_out_date,
            transfer_in_date: period.transfer_in_date,
            cross_org_transfer: period.cross_org_transfer,
        }
    }
}

/// The output of reconciling three rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Periods of the known population (active ∪ resigned), in population order.
    pub periods: Vec<ReconciledPeriod>,
    /// Periods synthesized for employees found only in the transfer log.
    pub abnormal_periods: Vec<ReconciledPeriod>,
}
