//! Calculation logic for the allowance engine.
//!
//! This module contains the inbound and outbound allowance rules, the
//! fee-sheet batch that dispatches rows to them, cross-organization transfer
//! classification, and the roster reconciler that splits employees at their
//! latest cross-level transfer.

mod batch_runner;
mod cross_org;
mod inbound_allowance;
mod outbound_allowance;
mod proration;
mod roster_reconciler;

pub use batch_runner::run_allowance_batch;
pub use cross_org::classify_transfer;
pub use inbound_allowance::{
    INBOUND_RULE_ID, compute_inbound_allowance, compute_inbound_allowance_from_str,
};
pub use outbound_allowance::{
    OUTBOUND_RULE_ID, compute_outbound_allowance, compute_outbound_allowance_from_str,
};
pub use proration::{MONTHS_PER_YEAR, allowance_amount, full_month, half_month};
pub use roster_reconciler::{RosterSources, abnormal_periods, known_population, reconcile_rosters};
