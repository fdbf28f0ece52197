//! Budget balance tracking.
//!
//! A [`BudgetLedger`] holds the annual allowance budget of an organization
//! and the amounts already spent from it. It lives only as long as the
//! session that owns it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single spending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Stable identifier, never reused within a ledger.
    pub id: u64,
    /// Amount spent.
    pub amount: Decimal,
}

/// Snapshot of a ledger's figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// The annual budget.
    pub total: Decimal,
    /// Sum of all entries.
    pub used: Decimal,
    /// `total - used`; negative when overspent.
    pub balance: Decimal,
    /// The overspent amount, if any.
    pub overspend: Option<Decimal>,
    /// Entries in insertion order.
    pub entries: Vec<LedgerEntry>,
}

/// An annual budget and the list of amounts spent from it.
///
/// # Example
///
/// ```
/// use allowance_engine::models::BudgetLedger;
/// use rust_decimal::Decimal;
///
/// let mut ledger = BudgetLedger::new(Decimal::new(1000, 0)).unwrap();
/// let id = ledger.add_entry(Decimal::new(300, 0)).unwrap();
/// ledger.update_entry(id, Decimal::new(1200, 0)).unwrap();
/// assert_eq!(ledger.overspend(), Some(Decimal::new(200, 0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetLedger {
    total: Decimal,
    entries: Vec<LedgerEntry>,
    next_id: u64,
}

impl BudgetLedger {
    /// Creates an empty ledger with the given annual budget.
    pub fn new(total: Decimal) -> EngineResult<Self> {
        let mut ledger = Self::default();
        ledger.set_total(total)?;
        Ok(ledger)
    }

    /// Replaces the annual budget.
    pub fn set_total(&mut self, total: Decimal) -> EngineResult<()> {
        self.total = non_negative(total, "total")?;
        Ok(())
    }

    /// Appends an entry and returns its identifier.
    pub fn add_entry(&mut self, amount: Decimal) -> EngineResult<u64> {
        let amount = non_negative(amount, "amount")?;
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(LedgerEntry { id, amount });
        Ok(id)
    }

    /// Changes the amount of an existing entry.
    pub fn update_entry(&mut self, id: u64, amount: Decimal) -> EngineResult<()> {
        let amount = non_negative(amount, "amount")?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| unknown_entry(id))?;
        entry.amount = amount;
        Ok(())
    }

    /// Removes an entry.
    pub fn remove_entry(&mut self, id: u64) -> EngineResult<LedgerEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| unknown_entry(id))?;
        Ok(self.entries.remove(index))
    }

    /// Clears the budget and all entries. Identifiers keep increasing.
    pub fn reset(&mut self) {
        self.total = Decimal::ZERO;
        self.entries.clear();
    }

    /// The annual budget.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Sum of all entries.
    pub fn total_used(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Remaining budget; negative when overspent.
    pub fn balance(&self) -> Decimal {
        self.total - self.total_used()
    }

    /// The overspent amount, if the balance is negative.
    pub fn overspend(&self) -> Option<Decimal> {
        let balance = self.balance();
        (balance < Decimal::ZERO).then(|| balance.abs())
    }

    /// Returns all figures at once.
    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary {
            total: self.total,
            used: self.total_used(),
            balance: self.balance(),
            overspend: self.overspend(),
            entries: self.entries.clone(),
        }
    }
}

fn non_negative(value: Decimal, field: &str) -> EngineResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(EngineError::LedgerError {
            message: format!("{} must not be negative, got {}", field, value),
        });
    }
    Ok(value)
}

fn unknown_entry(id: u64) -> EngineError {
    EngineError::LedgerError {
        message: format!("no entry with id {}", id),
    }
}
