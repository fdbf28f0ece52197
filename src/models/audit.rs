//! Audit and data-quality records.
//!
//! Every allowance figure carries an [`AuditStep`] explaining how it was
//! reached. Rows that cannot be calculated automatically produce a
//! [`DataQualityWarning`] instead of an error.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The kind of data-quality problem found in an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// The employee ID occurs on more than one row of the sheet.
    DuplicateEmployeeId,
    /// The populated dates match none of the automatic allowance rules.
    UnresolvedDateState,
    /// The row could not be read at all (e.g. a malformed date cell).
    RejectedRow,
}

/// A non-fatal finding that requires manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    /// What kind of problem was found.
    pub code: WarningCode,
    /// The employee the row belongs to, if it could be read.
    pub employee_id: String,
    /// 1-based line in the source sheet, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// 0-based position in a JSON batch, when the row came from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// A human-readable description.
    pub message: String,
}

impl DataQualityWarning {
    /// Creates a warning without a source line.
    pub fn new(code: WarningCode, employee_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            employee_id: employee_id.into(),
            line: None,
            row: None,
            message: message.into(),
        }
    }

    /// Attaches the source line.
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Attaches the position of the row within a JSON batch.
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}
