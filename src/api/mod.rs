//! HTTP API module for the allowance engine.
//!
//! This module provides the JSON endpoints for single-employee allowance
//! calculations, fee-sheet batches, roster reconciliation and budget balances.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BatchRequest, BudgetRequest, InboundRequest, OutboundRequest, ReconcileRequest,
    SettingsOverride,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
