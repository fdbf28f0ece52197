//! Configuration loading and management for the allowance engine.
//!
//! This module provides functionality to load the engine configuration from a
//! YAML file: the monthly allowance rate, the cutoff day, the default target
//! year and the organization level used for reconciliation.
//!
//! # Example
//!
//! ```no_run
//! use allowance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Monthly rate: {}", loader.config().allowance_settings().monthly_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceSection, AllowanceSettings, DEFAULT_CUTOFF_DAY, DEFAULT_MONTHLY_RATE, EngineConfig,
    RECOMMENDED_MAX_CUTOFF_DAY, ReconciliationSection,
};
