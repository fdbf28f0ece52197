//! HTTP request handlers for the allowance engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler tags its log lines with a fresh correlation ID and calls the
//! synchronous calculation functions inline.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    compute_inbound_allowance_from_str, compute_outbound_allowance_from_str, reconcile_rosters,
    run_allowance_batch,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllowanceBatch, AllowanceCalculation, BudgetLedger, BudgetSummary, ReconciliationResult,
};

use super::request::{
    BatchRequest, BudgetRequest, InboundRequest, OutboundRequest, ReconcileRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/allowance/inbound", post(inbound_handler))
        .route("/allowance/outbound", post(outbound_handler))
        .route("/allowance/batch", post(batch_handler))
        .route("/roster/reconcile", post(reconcile_handler))
        .route("/budget/balance", post(budget_handler))
        .with_state(state)
}

/// Handler for POST /allowance/inbound.
async fn inbound_handler(
    State(state): State<AppState>,
    payload: Result<Json<InboundRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing inbound allowance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match compute_inbound(&state, &request) {
        Ok(calc) => {
            info!(
                correlation_id = %correlation_id,
                join_date = %request.join_date,
                months = %calc.result.months,
                amount = %calc.result.amount,
                duration_us = start_time.elapsed().as_micros(),
                "Inbound allowance calculated"
            );
            json_response(StatusCode::OK, calc)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /allowance/outbound.
async fn outbound_handler(
    State(state): State<AppState>,
    payload: Result<Json<OutboundRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing outbound allowance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match compute_outbound(&state, &request) {
        Ok(calc) => {
            info!(
                correlation_id = %correlation_id,
                join_date = %request.join_date,
                leave_date = %request.leave_date,
                months = %calc.result.months,
                amount = %calc.result.amount,
                duration_us = start_time.elapsed().as_micros(),
                "Outbound allowance calculated"
            );
            json_response(StatusCode::OK, calc)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /allowance/batch.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing allowance batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match run_batch(&state, &request) {
        Ok(batch) => {
            info!(
                correlation_id = %correlation_id,
                rows = batch.lines.len(),
                warnings = batch.warnings.len(),
                rejected = batch.summary.rejected_rows,
                total_amount = %batch.summary.total_amount,
                duration_us = start_time.elapsed().as_micros(),
                "Allowance batch completed"
            );
            json_response(StatusCode::OK, batch)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /roster/reconcile.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing roster reconciliation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let level = request.org_level.unwrap_or(state.config().org_level());
    let start_time = Instant::now();
    match reconcile_rosters(&request.sources, level) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                org_level = %level,
                periods = result.periods.len(),
                abnormal_periods = result.abnormal_periods.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Roster reconciliation completed"
            );
            json_response::<ReconciliationResult>(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /budget/balance.
async fn budget_handler(payload: Result<Json<BudgetRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing budget balance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match budget_summary(&request) {
        Ok(summary) => {
            if let Some(overspend) = summary.overspend {
                warn!(correlation_id = %correlation_id, overspend = %overspend, "Budget overspent");
            }
            json_response(StatusCode::OK, summary)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn compute_inbound(state: &AppState, request: &InboundRequest) -> EngineResult<AllowanceCalculation> {
    let config = state.config();
    let target_year = config.target_year(request.target_year)?;
    let settings = request.settings.apply(config.allowance_settings())?;
    compute_inbound_allowance_from_str(&request.join_date, target_year, &settings)
}

fn compute_outbound(
    state: &AppState,
    request: &OutboundRequest,
) -> EngineResult<AllowanceCalculation> {
    let config = state.config();
    let target_year = config.target_year(request.target_year)?;
    let settings = request.settings.apply(config.allowance_settings())?;
    compute_outbound_allowance_from_str(
        &request.join_date,
        &request.leave_date,
        target_year,
        &settings,
    )
}

fn run_batch(state: &AppState, request: &BatchRequest) -> EngineResult<AllowanceBatch> {
    let config = state.config();
    let target_year = config.target_year(request.target_year)?;
    let settings = request.settings.apply(config.allowance_settings())?;
    let sheet = request.fee_sheet();
    Ok(run_allowance_batch(&sheet.records, target_year, &settings).with_rejected(sheet.rejected))
}

fn budget_summary(request: &BudgetRequest) -> EngineResult<BudgetSummary> {
    let mut ledger = BudgetLedger::new(request.total)?;
    for amount in &request.used {
        ledger.add_entry(*amount)?;
    }
    Ok(ledger.summary())
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including our own
            // date and configuration validation errors.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("Invalid date") {
                ApiError::invalid_date(body_text)
            } else if body_text.contains("Invalid configuration value") {
                ApiError::invalid_config(body_text)
            } else if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
