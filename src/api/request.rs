//! Request types for the allowance engine API.
//!
//! Dates of the single-employee endpoints are taken as text so that malformed
//! values surface as `INVALID_DATE` rather than a generic JSON error.
//! Optional fields fall back to the loaded configuration. Batch rows are read
//! one at a time so that a bad row is reported without losing the others.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculation::RosterSources;
use crate::config::AllowanceSettings;
use crate::error::EngineResult;
use crate::models::{DataQualityWarning, EmployeeRecord, OrgLevel, WarningCode};
use crate::roster::FeeSheet;

/// Per-request overrides of the configured allowance settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverride {
    /// Allowance per full month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rate: Option<Decimal>,
    /// Day of month deciding full versus half months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_day: Option<u32>,
}

impl SettingsOverride {
    /// Applies the overrides on top of `base` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`](crate::error::EngineError::InvalidConfig)
    /// for a negative rate or a cutoff day outside 1..=31.
    pub fn apply(self, base: AllowanceSettings) -> EngineResult<AllowanceSettings> {
        let settings = AllowanceSettings {
            monthly_rate: self.monthly_rate.unwrap_or(base.monthly_rate),
            cutoff_day: self.cutoff_day.unwrap_or(base.cutoff_day),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Request body for `POST /allowance/inbound`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRequest {
    /// Hire date, or transfer-in date for transferred employees (`YYYY-MM-DD`).
    pub join_date: String,
    /// The year to compute for; defaults to the configured target year.
    #[serde(default)]
    pub target_year: Option<i32>,
    /// Settings overrides.
    #[serde(flatten)]
    pub settings: SettingsOverride,
}

/// Request body for `POST /allowance/outbound`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundRequest {
    /// Hire date (`YYYY-MM-DD`).
    pub join_date: String,
    /// Last working day or transfer-out date (`YYYY-MM-DD`).
    pub leave_date: String,
    /// The year to compute for; defaults to the configured target year.
    #[serde(default)]
    pub target_year: Option<i32>,
    /// Settings overrides.
    #[serde(flatten)]
    pub settings: SettingsOverride,
}

/// Request body for `POST /allowance/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The year to compute for; defaults to the configured target year.
    #[serde(default)]
    pub target_year: Option<i32>,
    /// Settings overrides.
    #[serde(flatten)]
    pub settings: SettingsOverride,
    /// Fee-sheet rows, each an [`EmployeeRecord`] object.
    pub rows: Vec<Value>,
}

impl BatchRequest {
    /// Reads every row into an [`EmployeeRecord`].
    ///
    /// A row that does not read (a malformed date, a missing employee ID) is
    /// reported as a `rejected_row` warning carrying its position.
    pub fn fee_sheet(&self) -> FeeSheet {
        let mut sheet = FeeSheet::default();
        for (index, row) in self.rows.iter().enumerate() {
            match EmployeeRecord::deserialize(row) {
                Ok(record) => sheet.records.push(record),
                Err(err) => {
                    let employee_id = row
                        .get("employee_id")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .trim();
                    sheet.rejected.push(
                        DataQualityWarning::new(
                            WarningCode::RejectedRow,
                            employee_id,
                            format!("row {} skipped: {}", index, err),
                        )
                        .at_row(index),
                    );
                }
            }
        }
        sheet
    }
}

/// Request body for `POST /roster/reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Organization level to reconcile at; defaults to the configured level.
    #[serde(default)]
    pub org_level: Option<OrgLevel>,
    /// Active roster, resigned roster and transfer log.
    #[serde(flatten)]
    pub sources: RosterSources,
}

/// Request body for `POST /budget/balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    /// The annual budget.
    pub total: Decimal,
    /// Amounts spent so far.
    #[serde(default)]
    pub used: Vec<Decimal>,
}
