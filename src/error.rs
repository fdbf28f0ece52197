//! Error types for the allowance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while prorating allowances or
//! reconciling rosters.

use thiserror::Error;

/// The main error type for the allowance engine.
///
/// Data-quality findings (duplicate employee IDs, unresolvable date states) are
/// not errors; they are reported as [`DataQualityWarning`](crate::models::DataQualityWarning)
/// values next to the computed output.
///
/// # Example
///
/// ```
/// use allowance_engine::error::EngineError;
///
/// let error = EngineError::InvalidDate {
///     value: "2024-13-01".to_string(),
///     message: "expected YYYY-MM-DD".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid date '2024-13-01': expected YYYY-MM-DD");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date value was malformed or of the wrong shape.
    #[error("Invalid date '{value}': {message}")]
    InvalidDate {
        /// The raw value that failed to parse.
        value: String,
        /// A description of the expected format.
        message: String,
    },

    /// A date cell in a tabular source could not be parsed.
    #[error("Invalid date in column '{column}' on line {line}: '{value}'")]
    InvalidDateCell {
        /// The header of the offending column.
        column: String,
        /// The 1-based line number in the source.
        line: u64,
        /// The raw cell value.
        value: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of range.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The field that was invalid.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A required column was absent from a tabular source.
    #[error("Required column '{column}' not found in {source_name}")]
    MissingColumn {
        /// The canonical name of the missing column.
        column: String,
        /// The kind of source being read (e.g. "transfer log").
        source_name: String,
    },

    /// The underlying CSV reader or writer failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Internal consistency of the reconciliation was broken.
    ///
    /// This is fatal: it signals that the population-membership logic upstream
    /// produced an employee the reconciler cannot have seen.
    #[error("Invariant violated for employee '{employee_id}': {message}")]
    InvariantViolation {
        /// The employee the violation was detected for.
        employee_id: String,
        /// A description of the violation.
        message: String,
    },

    /// A budget ledger operation referred to an unknown entry or invalid amount.
    #[error("Budget ledger error: {message}")]
    LedgerError {
        /// A description of the ledger error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_displays_value_and_message() {
        let error = EngineError::InvalidDate {
            value: "not-a-date".to_string(),
            message: "expected YYYY-MM-DD".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date 'not-a-date': expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_invalid_date_cell_displays_column_and_line() {
        let error = EngineError::InvalidDateCell {
            column: "hire_date".to_string(),
            line: 7,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date in column 'hire_date' on line 7: 'yesterday'"
        );
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "org_level".to_string(),
            message: "must be between 1 and 4, got 7".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value 'org_level': must be between 1 and 4, got 7"
        );
    }

    #[test]
    fn test_missing_column_displays_column_and_source() {
        let error = EngineError::MissingColumn {
            column: "employee_id".to_string(),
            source_name: "transfer log".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Required column 'employee_id' not found in transfer log"
        );
    }

    #[test]
    fn test_invariant_violation_displays_employee() {
        let error = EngineError::InvariantViolation {
            employee_id: "E042".to_string(),
            message: "abnormal employee has no transfer events".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invariant violated for employee 'E042': abnormal employee has no transfer events"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_config() -> EngineResult<()> {
            Err(EngineError::InvalidConfig {
                field: "cutoff_day".to_string(),
                message: "must be positive".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_config()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
