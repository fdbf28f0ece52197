//! Communication allowance engine.
//!
//! This crate prorates a yearly communication allowance by the months an
//! employee belonged to an organization, and reconciles the active roster,
//! resigned roster and transfer log into per-organization periods that feed
//! the allowance calculation.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
