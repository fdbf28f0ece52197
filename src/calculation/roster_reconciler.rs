//! Roster reconciliation.
//!
//! Merges the active roster, the resigned roster and the transfer log into one
//! list of [`ReconciledPeriod`]s per employee. An employee whose latest
//! transfer crossed the configured organization level is split into a
//! "before" and an "after" period.
//!
//! Employees that appear in the transfer log but in neither roster are
//! "abnormal": usually an upstream export dropped them. Their periods are
//! synthesized from the transfer log alone and reported separately.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeeRecord, OptionalDate, OrgLevel, ReconciledPeriod, ReconciliationResult, TransferEvent,
    TransferLabel, sorted_by_date,
};

use super::cross_org::classify_transfer;

/// The three rosters a reconciliation runs over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSources {
    /// Employees currently in the company.
    #[serde(default)]
    pub active: Vec<EmployeeRecord>,
    /// Employees who resigned; `leave_date` carries their last working day.
    #[serde(default)]
    pub resigned: Vec<EmployeeRecord>,
    /// Organization transfers, in any order.
    #[serde(default)]
    pub transfers: Vec<TransferEvent>,
}

/// Reconciles the rosters at the given organization level.
///
/// # Errors
///
/// Returns [`EngineError::InvariantViolation`] if an abnormal employee ends up
/// without transfer events, which indicates broken population logic rather
/// than bad input.
///
/// # Examples
///
/// ```
/// use allowance_engine::calculation::{RosterSources, reconcile_rosters};
/// use allowance_engine::models::{EmployeeRecord, OrgLevel, OrgPath};
///
/// let sources = RosterSources {
///     active: vec![EmployeeRecord::new("E001", "Lin", OrgPath::new("G", "R", "N", "Sales"))],
///     ..Default::default()
/// };
///
/// let result = reconcile_rosters(&sources, OrgLevel::try_from(3).unwrap()).unwrap();
/// assert_eq!(result.periods.len(), 1);
/// assert!(result.abnormal_periods.is_empty());
/// ```
pub fn reconcile_rosters(
    sources: &RosterSources,
    level: OrgLevel,
) -> EngineResult<ReconciliationResult> {
    info!(
        active = sources.active.len(),
        resigned = sources.resigned.len(),
        transfers = sources.transfers.len(),
        org_level = %level,
        "Reconciling rosters"
    );

    let population = known_population(&sources.active, &sources.resigned);
    let transfers = TransferIndex::new(&sources.transfers);

    let periods = reconcile_known_employees(&population, sources, &transfers, level);

    let known: HashSet<&str> = population.iter().map(String::as_str).collect();
    let abnormal_periods = reconcile_abnormal_employees(&known, &transfers, level)?;

    info!(
        employees = population.len(),
        periods = periods.len(),
        abnormal_periods = abnormal_periods.len(),
        "Roster reconciliation completed"
    );

    Ok(ReconciliationResult {
        periods,
        abnormal_periods,
    })
}

/// Returns the IDs of all employees on the active or resigned roster, in
/// order of first appearance (active roster first). Blank IDs are skipped.
pub fn known_population(active: &[EmployeeRecord], resigned: &[EmployeeRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    active
        .iter()
        .chain(resigned.iter())
        .map(|record| record.employee_id.trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Synthesizes the periods of one abnormal employee from their transfer events.
///
/// # Errors
///
/// An abnormal employee comes from the transfer log by construction, so an
/// empty `events` slice is an [`EngineError::InvariantViolation`].
pub fn abnormal_periods(
    employee_id: &str,
    events: &[&TransferEvent],
    level: OrgLevel,
) -> EngineResult<Vec<ReconciledPeriod>> {
    let latest = sorted_by_date(events.iter().copied())
        .last()
        .copied()
        .ok_or_else(|| EngineError::InvariantViolation {
            employee_id: employee_id.to_string(),
            message: "abnormal employee has no transfer events".to_string(),
        })?;

    let base = ReconciledPeriod {
        employee_id: latest.employee_id.trim().to_string(),
        name: latest.name.clone(),
        org_path: latest.before.clone(),
        hire_date: latest.hire_date,
        leave_date: OptionalDate::ABSENT,
        transfer_out_date: OptionalDate::ABSENT,
        transfer_in_date: OptionalDate::ABSENT,
        cross_org_transfer: TransferLabel::None,
    };

    Ok(apply_latest_transfer(base, latest, level))
}

/// Transfer events grouped by employee, remembering first-appearance order.
struct TransferIndex<'a> {
    order: Vec<&'a str>,
    by_employee: HashMap<&'a str, Vec<&'a TransferEvent>>,
}

impl<'a> TransferIndex<'a> {
    fn new(events: &'a [TransferEvent]) -> Self {
        let mut order = Vec::new();
        let mut by_employee: HashMap<&str, Vec<&TransferEvent>> = HashMap::new();
        for event in events {
            let id = event.employee_id.trim();
            if id.is_empty() {
                continue;
            }
            let group = by_employee.entry(id).or_default();
            if group.is_empty() {
                order.push(id);
            }
            group.push(event);
        }
        Self { order, by_employee }
    }

    fn events_of(&self, employee_id: &str) -> &[&'a TransferEvent] {
        self.by_employee
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn latest_of(&self, employee_id: &str) -> Option<&'a TransferEvent> {
        sorted_by_date(self.events_of(employee_id).iter().copied())
            .last()
            .copied()
    }
}

/// First record per employee ID; later duplicates are ignored.
fn first_by_id(records: &[EmployeeRecord]) -> HashMap<&str, &EmployeeRecord> {
    let mut index = HashMap::new();
    for record in records {
        let id = record.employee_id.trim();
        if !id.is_empty() {
            index.entry(id).or_insert(record);
        }
    }
    index
}

fn reconcile_known_employees(
    population: &[String],
    sources: &RosterSources,
    transfers: &TransferIndex<'_>,
    level: OrgLevel,
) -> Vec<ReconciledPeriod> {
    let active = first_by_id(&sources.active);
    let resigned = first_by_id(&sources.resigned);

    let mut periods = Vec::with_capacity(population.len());
    for employee_id in population {
        let id = employee_id.as_str();
        let base = base_period(id, active.get(id).copied(), resigned.get(id).copied());

        match transfers.latest_of(id) {
            None => periods.push(base),
            Some(latest) => {
                let split = apply_latest_transfer(base, latest, level);
                debug!(
                    employee_id = id,
                    transfer_date = %latest.transfer_date,
                    periods = split.len(),
                    "Applied latest transfer"
                );
                periods.extend(split);
            }
        }
    }
    periods
}

fn reconcile_abnormal_employees(
    known: &HashSet<&str>,
    transfers: &TransferIndex<'_>,
    level: OrgLevel,
) -> EngineResult<Vec<ReconciledPeriod>> {
    let abnormal: Vec<&str> = transfers
        .order
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();

    if !abnormal.is_empty() {
        warn!(
            count = abnormal.len(),
            "Employees found in transfer log but missing from both rosters"
        );
    }

    let mut periods = Vec::new();
    for id in abnormal {
        periods.extend(abnormal_periods(id, transfers.events_of(id), level)?);
    }
    Ok(periods)
}

/// Builds the untransferred period of a known employee: identity, organization
/// and hire date from the active roster (else the resigned roster), leave date
/// from the resigned roster.
fn base_period(
    employee_id: &str,
    active: Option<&EmployeeRecord>,
    resigned: Option<&EmployeeRecord>,
) -> ReconciledPeriod {
    let source = active.or(resigned);
    ReconciledPeriod {
        employee_id: employee_id.to_string(),
        name: source.map(|r| r.name.clone()).unwrap_or_default(),
        org_path: source.map(|r| r.org_path.clone()).unwrap_or_default(),
        hire_date: source.map(|r| r.hire_date).unwrap_or_default(),
        leave_date: resigned.map(|r| r.leave_date).unwrap_or_default(),
        transfer_out_date: OptionalDate::ABSENT,
        transfer_in_date: OptionalDate::ABSENT,
        cross_org_transfer: TransferLabel::None,
    }
}

/// Applies an employee's latest transfer to their base period.
///
/// Internal transfers keep one period in the pre-transfer organization.
/// Crossing transfers produce a "before" period ending on the transfer date and
/// an "after" period starting on it.
fn apply_latest_transfer(
    base: ReconciledPeriod,
    latest: &TransferEvent,
    level: OrgLevel,
) -> Vec<ReconciledPeriod> {
    let label = classify_transfer(level, latest);
    let transfer_date = OptionalDate::present(latest.transfer_date);

    if label.is_internal() {
        return vec![ReconciledPeriod {
            org_path: latest.before.clone(),
            transfer_in_date: OptionalDate::ABSENT,
            cross_org_transfer: label,
            ..base
        }];
    }

    let mut before = ReconciledPeriod {
        org_path: latest.before.clone(),
        transfer_in_date: OptionalDate::ABSENT,
        cross_org_transfer: label.clone(),
        ..base.clone()
    };

    before.transfer_out_date = transfer_date;
    let after = ReconciledPeriod {
        org_path: latest.after.clone(),
        transfer_in_date: transfer_date,
        transfer_out_date: OptionalDate::ABSENT,
        cross_org_transfer: label,
        ..base
    };

    vec![before, after]
}
