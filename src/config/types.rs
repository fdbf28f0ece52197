//! Configuration types for the allowance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::OrgLevel;

/// The default monthly allowance rate.
pub const DEFAULT_MONTHLY_RATE: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);

/// The default cutoff day for counting a partial month as a full month.
pub const DEFAULT_CUTOFF_DAY: u32 = 15;

/// Cutoff days above this value are allowed but skip short months entirely.
pub const RECOMMENDED_MAX_CUTOFF_DAY: u32 = 28;

/// Proration parameters shared by the inbound and outbound allowance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowanceSettings {
    /// Allowance paid for one full month.
    pub monthly_rate: Decimal,
    /// The day of month that decides between a full and a half month.
    pub cutoff_day: u32,
}

impl Default for AllowanceSettings {
    fn default() -> Self {
        Self {
            monthly_rate: DEFAULT_MONTHLY_RATE,
            cutoff_day: DEFAULT_CUTOFF_DAY,
        }
    }
}

impl AllowanceSettings {
    /// Checks that the rate is non-negative and the cutoff day is a day of month.
    ///
    /// # Example
    ///
    /// ```
    /// use allowance_engine::config::AllowanceSettings;
    ///
    /// assert!(AllowanceSettings::default().validate().is_ok());
    ///
    /// let settings = AllowanceSettings { cutoff_day: 0, ..Default::default() };
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.monthly_rate < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "monthly_rate".to_string(),
                message: format!("must not be negative, got {}", self.monthly_rate),
            });
        }
        if !(1..=31).contains(&self.cutoff_day) {
            return Err(EngineError::InvalidConfig {
                field: "cutoff_day".to_string(),
                message: format!("must be between 1 and 31, got {}", self.cutoff_day),
            });
        }
        if self.cutoff_day > RECOMMENDED_MAX_CUTOFF_DAY {
            warn!(
                cutoff_day = self.cutoff_day,
                "Cutoff day exceeds {} and behaves differently in short months",
                RECOMMENDED_MAX_CUTOFF_DAY
            );
        }
        Ok(())
    }
}

/// The `allowance` section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSection {
    /// Proration parameters.
    #[serde(flatten)]
    pub settings: AllowanceSettings,
    /// The year to calculate for when a caller does not specify one.
    #[serde(default)]
    pub target_year: Option<i32>,
}

/// The `reconciliation` section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSection {
    /// The organization level at which transfers split a record.
    #[serde(default)]
    pub org_level: OrgLevel,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Allowance proration configuration.
    #[serde(default)]
    pub allowance: AllowanceSection,
    /// Roster reconciliation configuration.
    #[serde(default)]
    pub reconciliation: ReconciliationSection,
}

impl EngineConfig {
    /// Validates all sections.
    pub fn validate(&self) -> EngineResult<()> {
        self.allowance.settings.validate()
    }

    /// Returns the allowance settings.
    pub fn allowance_settings(&self) -> AllowanceSettings {
        self.allowance.settings
    }

    /// Returns the configured organization level.
    pub fn org_level(&self) -> OrgLevel {
        self.reconciliation.org_level
    }

    /// Returns the target year, preferring an explicit request value.
    pub fn target_year(&self, requested: Option<i32>) -> EngineResult<i32> {
        requested
            .or(self.allowance.target_year)
            .ok_or_else(|| EngineError::InvalidConfig {
                field: "target_year".to_string(),
                message: "no target year given and none configured".to_string(),
            })
    }
}
